//! Poisson distribution: probability of k events in an interval for a rate lambda.

use serde_json::Value;

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::ExampleApp;
use crate::gallery::stats;

const MAX_LAMBDA: f64 = 1_000_000.0;

pub fn app() -> ExampleApp {
    let details = Node::card(
        "Details",
        vec![
            Node::markdown(
                "The Poisson distribution describes the probability of obtaining *k* \
                 successes during a given time interval.",
            ),
            Node::markdown(
                "If a random variable X follows a Poisson distribution, then the \
                 probability that X = k successes is:",
            ),
            Node::markdown("`P(X = k) = e^(-λ) · λ^k / k!`"),
        ],
    );

    let inputs = Node::card(
        "Inputs",
        vec![Node::input(
            "poisson-distribution-x-lambda",
            "lambda (must be >= 0)",
            4,
        )],
    );

    let graph = Node::card("Histogram", vec![Node::graph("poisson-distribution-x-histogram")]);

    ExampleApp {
        title: "Poisson distribution".to_string(),
        description: "Probability of k events in a fixed interval, given the average \
                      rate lambda. Change lambda to reshape the histogram."
            .to_string(),
        layout: Node::column(vec![
            Node::heading("Poisson distribution graph"),
            Node::Rule,
            details,
            inputs,
            graph,
        ]),
        callbacks: vec![Callback::new(
            ("poisson-distribution-x-histogram", Prop::Figure),
            &[("poisson-distribution-x-lambda", Prop::Value)],
            histogram,
        )],
    }
}

fn histogram(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let value = args.first().unwrap_or(&Value::Null);
    if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Ok(None);
    }

    let lambda = stats::number(value)
        .ok_or_else(|| CallbackError::InvalidInput(format!("lambda must be a number, got {value}")))?
        .trunc();
    if lambda < 0.0 {
        return Err(CallbackError::InvalidInput(format!("lambda must be >= 0, got {lambda}")));
    }
    if lambda > MAX_LAMBDA {
        return Err(CallbackError::InvalidInput(format!("lambda must be <= {MAX_LAMBDA}")));
    }

    let spread = 4.0 * lambda.sqrt();
    let lo = (lambda - spread).max(0.0).floor() as u64;
    let hi = ((lambda + spread).ceil() as u64).max(lo + 10);
    let figure = Figure::new(&format!("Poisson(λ = {lambda})"))
        .axes("k", "P(X = k)")
        .bars(stats::discrete_bars(lo, hi, |k| stats::poisson_pmf(lambda, k)));
    Ok(Some(figure.to_value()?))
}
