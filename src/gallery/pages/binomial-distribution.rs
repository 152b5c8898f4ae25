//! Binomial distribution: successes in n independent trials with probability p.

use serde_json::Value;

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::ExampleApp;
use crate::gallery::stats;

const MAX_TRIALS: f64 = 10_000.0;

pub fn app() -> ExampleApp {
    ExampleApp {
        title: "Binomial distribution".to_string(),
        description: "Number of successes in n independent yes/no trials that each \
                      succeed with probability p."
            .to_string(),
        layout: Node::column(vec![
            Node::heading("Binomial distribution graph"),
            Node::Rule,
            Node::card(
                "Details",
                vec![
                    Node::markdown(
                        "A binomial experiment repeats the same trial *n* times. Each \
                         trial succeeds with probability *p*, independently of the others.",
                    ),
                    Node::markdown("`P(X = k) = C(n, k) · p^k · (1 - p)^(n - k)`"),
                ],
            ),
            Node::row(vec![
                Node::card("Trials", vec![Node::input("binomial-distribution-x-n", "n (whole number)", 20)]),
                Node::card(
                    "Probability",
                    vec![Node::input("binomial-distribution-x-p", "p (between 0 and 1)", 0.5)],
                ),
            ]),
            Node::card("Distribution", vec![Node::graph("binomial-distribution-x-graph")]),
            Node::output("binomial-distribution-x-moments"),
        ]),
        callbacks: vec![
            Callback::new(
                ("binomial-distribution-x-graph", Prop::Figure),
                &[
                    ("binomial-distribution-x-n", Prop::Value),
                    ("binomial-distribution-x-p", Prop::Value),
                ],
                distribution,
            ),
            Callback::new(
                ("binomial-distribution-x-moments", Prop::Children),
                &[
                    ("binomial-distribution-x-n", Prop::Value),
                    ("binomial-distribution-x-p", Prop::Value),
                ],
                moments,
            ),
        ],
    }
}

fn parameters(args: &[Value]) -> Result<(u64, f64), CallbackError> {
    let n = args
        .first()
        .and_then(stats::number)
        .ok_or_else(|| CallbackError::InvalidInput("n must be a number".to_string()))?;
    let p = args
        .get(1)
        .and_then(stats::number)
        .ok_or_else(|| CallbackError::InvalidInput("p must be a number".to_string()))?;

    if n < 0.0 || n.fract() != 0.0 || n > MAX_TRIALS {
        return Err(CallbackError::InvalidInput(format!(
            "n must be a whole number between 0 and {MAX_TRIALS}, got {n}"
        )));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(CallbackError::InvalidInput(format!("p must be between 0 and 1, got {p}")));
    }
    Ok((n as u64, p))
}

fn distribution(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let (n, p) = parameters(args)?;
    let figure = Figure::new(&format!("Binomial(n = {n}, p = {p})"))
        .axes("k", "P(X = k)")
        .bars(stats::discrete_bars(0, n, |k| stats::binomial_pmf(n, p, k)));
    Ok(Some(figure.to_value()?))
}

fn moments(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let (n, p) = parameters(args)?;
    let mean = n as f64 * p;
    let variance = mean * (1.0 - p);
    Ok(Some(Value::String(format!(
        "**Mean** {mean:.3} · **Variance** {variance:.3} · **Std** {:.3}",
        variance.sqrt()
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_distribution_has_n_plus_one_bars() {
        let value = distribution(&[json!(20), json!(0.5)]).unwrap().unwrap();
        let figure = Figure::from_value(&value).unwrap();
        assert_eq!(figure.bars.len(), 21);
        assert!((figure.bars[10].value - stats::binomial_pmf(20, 0.5, 10)).abs() < 1e-12);
    }

    #[test]
    fn test_text_inputs_are_parsed() {
        assert!(distribution(&[json!("5"), json!("0.2")]).unwrap().is_some());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        for args in [
            [json!(-1), json!(0.5)],
            [json!(2.5), json!(0.5)],
            [json!(10), json!(1.5)],
            [json!(10), json!("x")],
            [Value::Null, json!(0.5)],
        ] {
            assert!(matches!(distribution(&args), Err(CallbackError::InvalidInput(_))), "{args:?}");
        }
    }

    #[test]
    fn test_moments_text() {
        let value = moments(&[json!(20), json!(0.5)]).unwrap().unwrap();
        let text = value.as_str().unwrap();
        assert!(text.contains("**Mean** 10.000"));
        assert!(text.contains("**Variance** 5.000"));
    }
}
