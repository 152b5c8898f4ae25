//! Exponential distribution: waiting time between events of a Poisson process.

use serde_json::Value;

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::ExampleApp;
use crate::gallery::stats;

const BINS: usize = 20;

pub fn app() -> ExampleApp {
    ExampleApp {
        title: "Exponential distribution".to_string(),
        description: "Time until the next event when events happen at a constant \
                      average rate."
            .to_string(),
        layout: Node::column(vec![
            Node::heading("Exponential distribution graph"),
            Node::Rule,
            Node::card(
                "Details",
                vec![
                    Node::markdown("`f(x) = rate · e^(-rate · x)` for x ≥ 0."),
                    Node::markdown("The mean waiting time is `1 / rate`."),
                ],
            ),
            Node::input("exponential-distribution-x-rate", "rate (> 0)", 1),
            Node::card("Density", vec![Node::graph("exponential-distribution-x-density")]),
            Node::output("exponential-distribution-x-mean"),
        ]),
        callbacks: vec![
            Callback::new(
                ("exponential-distribution-x-density", Prop::Figure),
                &[("exponential-distribution-x-rate", Prop::Value)],
                density,
            ),
            Callback::new(
                ("exponential-distribution-x-mean", Prop::Children),
                &[("exponential-distribution-x-rate", Prop::Value)],
                mean_wait,
            ),
        ],
    }
}

fn rate(args: &[Value]) -> Result<Option<f64>, CallbackError> {
    let Some(rate) = args.first().and_then(stats::number) else {
        return Ok(None);
    };
    if rate <= 0.0 {
        return Err(CallbackError::InvalidInput(format!("rate must be > 0, got {rate}")));
    }
    Ok(Some(rate))
}

fn density(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let Some(rate) = rate(args)? else {
        return Ok(None);
    };
    let figure = Figure::new(&format!("Exp(rate = {rate})"))
        .axes("x", "P(bin)")
        .bars(stats::continuous_bars(0.0, 5.0 / rate, BINS, |x| {
            stats::exponential_pdf(rate, x)
        }));
    Ok(Some(figure.to_value()?))
}

fn mean_wait(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    Ok(rate(args)?.map(|rate| Value::String(format!("Mean waiting time: **{:.3}**", 1.0 / rate))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_density_decreases() {
        let value = density(&[json!(2)]).unwrap().unwrap();
        let figure = Figure::from_value(&value).unwrap();
        assert_eq!(figure.bars.len(), BINS);
        assert!(figure.bars.windows(2).all(|w| w[0].value > w[1].value));
    }

    #[test]
    fn test_mean_wait() {
        assert_eq!(
            mean_wait(&[json!("4")]),
            Ok(Some(json!("Mean waiting time: **0.250**")))
        );
        assert_eq!(mean_wait(&[Value::Null]), Ok(None));
        assert!(mean_wait(&[json!(-2)]).is_err());
    }
}
