//! Compiles parsed clauses into rule tables
//!
//! Recognised clauses:
//!
//! ```text
//! diagnose(D, T) :- has_symptom(S1), ..., has_symptom(Sn) [, no_other_symptoms].
//! contraindicated(T, A).
//! safety_alert(W) :- patient_info(allergy, A), diagnose(D, T) [, contraindicated(T, A)].
//! explain_diagnosis(D, 'template').
//! ```
//!
//! Safety rule variables are resolved here, once, by enumerating
//! `contraindicated/2` facts in declaration order. Query time never unifies.

use std::collections::{BTreeMap, BTreeSet};

use crate::facts::{Token, TokenKind, ALLERGY};

use super::errors::{LoadErrorKind, RuleBaseLoadError, RuleLoadResult};
use super::parser::{Clause, Goal, Term};
use super::types::{DiagnosisRule, LoadWarning, MatchMode, SafetyRule, Template};

/// Output of a successful compile.
#[derive(Debug, Default)]
pub(crate) struct CompiledRules {
    pub diagnosis_rules: Vec<DiagnosisRule>,
    pub safety_rules: Vec<SafetyRule>,
    pub contraindications: Vec<(Token, Token)>,
    pub explanations: BTreeMap<Token, Template>,
    pub warnings: Vec<LoadWarning>,
}

enum ClauseKind {
    Diagnosis,
    Contraindication,
    Safety,
    Explanation,
}

fn classify(clause: &Clause) -> RuleLoadResult<ClauseKind> {
    let is_fact = clause.body.is_empty();
    match (clause.head.signature(), is_fact) {
        (("diagnose", 2), false) => Ok(ClauseKind::Diagnosis),
        (("diagnose", 2), true) => Err(clause.error(LoadErrorKind::EmptyDiagnosisBody)),
        (("safety_alert", 1), false) => Ok(ClauseKind::Safety),
        (("safety_alert", 1), true) => {
            Err(clause.error(LoadErrorKind::MissingGoal("patient_info(allergy, _)")))
        }
        (("contraindicated", 2), true) => Ok(ClauseKind::Contraindication),
        (("explain_diagnosis", 2), true) => Ok(ClauseKind::Explanation),
        ((name @ ("contraindicated" | "explain_diagnosis"), arity), false) => Err(clause.error(
            LoadErrorKind::InvalidHead(format!("{}/{} must be a fact", name, arity)),
        )),
        ((name, arity), _) => Err(clause.error(LoadErrorKind::UnknownPredicate {
            name: name.to_string(),
            arity,
        })),
    }
}

fn goal_error(clause: &Clause, goal: &Goal, kind: LoadErrorKind) -> RuleBaseLoadError {
    RuleBaseLoadError::at(goal.line, goal.column, kind).with_clause(clause.to_string())
}

/// A clause argument after grammar checks.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Const(Token),
    Var(String),
}

fn slot(clause: &Clause, goal: &Goal, term: &Term, kind: TokenKind) -> RuleLoadResult<Slot> {
    match term {
        Term::Atom(s) => Token::parse(kind, s)
            .map(Slot::Const)
            .map_err(|e| goal_error(clause, goal, LoadErrorKind::InvalidToken(e.to_string()))),
        Term::Var(v) => Ok(Slot::Var(v.clone())),
        Term::Text(t) => Err(goal_error(clause, goal, LoadErrorKind::TextNotAllowed(t.clone()))),
    }
}

/// Like [`slot`] but variables are an error.
fn constant(clause: &Clause, goal: &Goal, term: &Term, kind: TokenKind) -> RuleLoadResult<Token> {
    match slot(clause, goal, term, kind)? {
        Slot::Const(token) => Ok(token),
        Slot::Var(v) => Err(goal_error(clause, goal, LoadErrorKind::UnboundVariable(v))),
    }
}

fn text(clause: &Clause, goal: &Goal, term: &Term) -> RuleLoadResult<Template> {
    match term {
        Term::Text(t) => Ok(Template::new(t.clone())),
        Term::Atom(a) => Ok(Template::new(a.clone())),
        Term::Var(v) => Err(goal_error(clause, goal, LoadErrorKind::UnboundVariable(v.clone()))),
    }
}

type Env = BTreeMap<String, Token>;

fn is_anonymous(var: &str) -> bool {
    var == "_"
}

fn unify(slot: &Slot, value: &Token, env: &mut Env) -> bool {
    match slot {
        Slot::Const(c) => c == value,
        Slot::Var(v) if is_anonymous(v) => true,
        Slot::Var(v) => match env.get(v) {
            Some(bound) => bound == value,
            None => {
                env.insert(v.clone(), value.clone());
                true
            }
        },
    }
}

fn resolve(slot: &Slot, env: &Env) -> Option<Token> {
    match slot {
        Slot::Const(c) => Some(c.clone()),
        Slot::Var(v) => env.get(v).cloned(),
    }
}

fn slot_name(slot: &Slot) -> String {
    match slot {
        Slot::Const(c) => c.to_string(),
        Slot::Var(v) => v.clone(),
    }
}

/// Compiles clauses in source order. Stops at the first error.
pub(crate) fn compile(clauses: &[Clause]) -> RuleLoadResult<CompiledRules> {
    let mut kinds = Vec::with_capacity(clauses.len());
    for clause in clauses {
        kinds.push(classify(clause)?);
    }

    let mut out = CompiledRules::default();

    // Facts first: safety rules may reference facts declared after them.
    for (clause, kind) in clauses.iter().zip(&kinds) {
        if let ClauseKind::Contraindication = kind {
            compile_contraindication(clause, &mut out)?;
        }
    }

    let mut first_treatment: BTreeMap<Token, (Token, usize)> = BTreeMap::new();
    for (clause, kind) in clauses.iter().zip(&kinds) {
        if let ClauseKind::Diagnosis = kind {
            let rule = compile_diagnosis(clause)?;
            match first_treatment.get(&rule.disease) {
                Some((treatment, line)) if *treatment != rule.treatment => {
                    out.warnings.push(LoadWarning {
                        line: rule.line,
                        message: format!(
                            "disease {} maps to treatment {} here but to {} at line {}; the earlier rule wins when both match",
                            rule.disease, rule.treatment, treatment, line
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    first_treatment.insert(rule.disease.clone(), (rule.treatment.clone(), rule.line));
                }
            }
            out.diagnosis_rules.push(rule);
        }
    }

    for (clause, kind) in clauses.iter().zip(&kinds) {
        match kind {
            ClauseKind::Safety => compile_safety(clause, &mut out)?,
            ClauseKind::Explanation => compile_explanation(clause, &first_treatment, &mut out)?,
            _ => {}
        }
    }

    if out.diagnosis_rules.is_empty() {
        return Err(RuleBaseLoadError::at(0, 0, LoadErrorKind::EmptyRuleBase));
    }

    Ok(out)
}

fn compile_contraindication(clause: &Clause, out: &mut CompiledRules) -> RuleLoadResult<()> {
    let head = &clause.head;
    let treatment = constant(clause, head, &head.args[0], TokenKind::Treatment)?;
    let allergy = constant(clause, head, &head.args[1], TokenKind::Allergy)?;

    let pair = (treatment, allergy);
    if out.contraindications.contains(&pair) {
        out.warnings.push(LoadWarning {
            line: clause.line(),
            message: format!("duplicate contraindicated({}, {}) ignored", pair.0, pair.1),
        });
    } else {
        out.contraindications.push(pair);
    }
    Ok(())
}

fn compile_diagnosis(clause: &Clause) -> RuleLoadResult<DiagnosisRule> {
    let head = &clause.head;
    let no_vars = |term: &Term, kind: TokenKind| -> RuleLoadResult<Token> {
        match slot(clause, head, term, kind)? {
            Slot::Const(token) => Ok(token),
            Slot::Var(v) => Err(clause.error(LoadErrorKind::VariableInDiagnosis(v))),
        }
    };
    let disease = no_vars(&head.args[0], TokenKind::Disease)?;
    let treatment = no_vars(&head.args[1], TokenKind::Treatment)?;

    let mut conditions: Vec<Token> = Vec::new();
    let mut match_mode = MatchMode::Subset;

    for goal in &clause.body {
        match goal.signature() {
            ("has_symptom", 1) => match slot(clause, goal, &goal.args[0], TokenKind::Symptom)? {
                Slot::Const(symptom) => {
                    if !conditions.contains(&symptom) {
                        conditions.push(symptom);
                    }
                }
                Slot::Var(v) => {
                    return Err(goal_error(clause, goal, LoadErrorKind::VariableInDiagnosis(v)));
                }
            },
            ("no_other_symptoms", 0) => match_mode = MatchMode::Exact,
            (name, arity) => {
                return Err(goal_error(
                    clause,
                    goal,
                    LoadErrorKind::UnknownPredicate {
                        name: name.to_string(),
                        arity,
                    },
                ));
            }
        }
    }

    if conditions.is_empty() {
        return Err(clause.error(LoadErrorKind::EmptyDiagnosisBody));
    }

    Ok(DiagnosisRule {
        disease,
        treatment,
        conditions,
        match_mode,
        line: clause.line(),
    })
}

struct SafetyGoals {
    allergy: Slot,
    disease: Slot,
    treatment: Slot,
    contraindicated: Option<(Slot, Slot)>,
}

fn safety_goals(clause: &Clause) -> RuleLoadResult<SafetyGoals> {
    let mut allergy = None;
    let mut diagnosis = None;
    let mut contraindicated = None;

    let duplicate = |goal: &Goal| {
        goal_error(
            clause,
            goal,
            LoadErrorKind::Unexpected {
                found: goal.to_string(),
                expected: "at most one goal per predicate in a safety rule",
            },
        )
    };

    for goal in &clause.body {
        match goal.signature() {
            ("patient_info", 2) => {
                match &goal.args[0] {
                    Term::Atom(k) if k == ALLERGY => {}
                    other => {
                        return Err(goal_error(
                            clause,
                            goal,
                            LoadErrorKind::UnsupportedAttribute(other.to_string()),
                        ));
                    }
                }
                if allergy.is_some() {
                    return Err(duplicate(goal));
                }
                allergy = Some(slot(clause, goal, &goal.args[1], TokenKind::Allergy)?);
            }
            ("diagnose", 2) => {
                if diagnosis.is_some() {
                    return Err(duplicate(goal));
                }
                diagnosis = Some((
                    slot(clause, goal, &goal.args[0], TokenKind::Disease)?,
                    slot(clause, goal, &goal.args[1], TokenKind::Treatment)?,
                ));
            }
            ("contraindicated", 2) => {
                if contraindicated.is_some() {
                    return Err(duplicate(goal));
                }
                contraindicated = Some((
                    slot(clause, goal, &goal.args[0], TokenKind::Treatment)?,
                    slot(clause, goal, &goal.args[1], TokenKind::Allergy)?,
                ));
            }
            (name, arity) => {
                return Err(goal_error(
                    clause,
                    goal,
                    LoadErrorKind::UnknownPredicate {
                        name: name.to_string(),
                        arity,
                    },
                ));
            }
        }
    }

    let allergy =
        allergy.ok_or_else(|| clause.error(LoadErrorKind::MissingGoal("patient_info(allergy, _)")))?;
    let (disease, treatment) =
        diagnosis.ok_or_else(|| clause.error(LoadErrorKind::MissingGoal("diagnose(_, _)")))?;

    Ok(SafetyGoals {
        allergy,
        disease,
        treatment,
        contraindicated,
    })
}

fn compile_safety(clause: &Clause, out: &mut CompiledRules) -> RuleLoadResult<()> {
    let goals = safety_goals(clause)?;
    let head = &clause.head;

    // Candidate environments: one per matching contraindicated/2 fact, or a
    // single empty one when the rule does not consult the fact table.
    let envs: Vec<Env> = match &goals.contraindicated {
        Some((t_slot, a_slot)) => out
            .contraindications
            .iter()
            .filter_map(|(t, a)| {
                let mut env = Env::new();
                (unify(t_slot, t, &mut env) && unify(a_slot, a, &mut env)).then_some(env)
            })
            .collect(),
        None => vec![Env::new()],
    };

    if envs.is_empty() {
        out.warnings.push(LoadWarning {
            line: clause.line(),
            message: "safety rule never fires: no matching contraindicated/2 fact".to_string(),
        });
        return Ok(());
    }

    let mut seen = BTreeSet::new();
    for env in envs {
        let required = |slot: &Slot| {
            resolve(slot, &env)
                .ok_or_else(|| clause.error(LoadErrorKind::UnboundVariable(slot_name(slot))))
        };
        let treatment = required(&goals.treatment)?;
        let allergy = required(&goals.allergy)?;
        let disease = resolve(&goals.disease, &env);

        let warning = match &head.args[0] {
            Term::Text(t) => Template::new(t.clone()),
            Term::Atom(a) => {
                Token::parse(TokenKind::Warning, a)
                    .map_err(|e| clause.error(LoadErrorKind::InvalidToken(e.to_string())))?;
                Template::new(a.clone())
            }
            Term::Var(v) => match env.get(v).filter(|_| !is_anonymous(v)) {
                Some(token) => Template::new(token.to_string()),
                None => return Err(clause.error(LoadErrorKind::UnboundVariable(v.clone()))),
            },
        };

        let key = (
            treatment.clone(),
            allergy.clone(),
            disease.clone(),
            warning.as_str().to_string(),
        );
        if seen.insert(key) {
            out.safety_rules.push(SafetyRule {
                treatment,
                allergy,
                disease,
                warning,
                line: clause.line(),
            });
        }
    }

    Ok(())
}

fn compile_explanation(
    clause: &Clause,
    diseases: &BTreeMap<Token, (Token, usize)>,
    out: &mut CompiledRules,
) -> RuleLoadResult<()> {
    let head = &clause.head;
    let disease = constant(clause, head, &head.args[0], TokenKind::Disease)?;
    let template = text(clause, head, &head.args[1])?;

    if !diseases.contains_key(&disease) {
        out.warnings.push(LoadWarning {
            line: clause.line(),
            message: format!("explanation for {} which no diagnosis rule produces", disease),
        });
    }

    if out.explanations.contains_key(&disease) {
        out.warnings.push(LoadWarning {
            line: clause.line(),
            message: format!("duplicate explanation for {} ignored", disease),
        });
    } else {
        out.explanations.insert(disease, template);
    }
    Ok(())
}
