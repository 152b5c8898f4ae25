//! Normal distribution with adjustable mean and standard deviation.

use serde_json::Value;

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::ExampleApp;
use crate::gallery::stats;

const BINS: usize = 24;

pub fn app() -> ExampleApp {
    ExampleApp {
        title: "Normal distribution".to_string(),
        description: "The bell curve. Move the mean to shift it, change the standard \
                      deviation to widen or narrow it."
            .to_string(),
        layout: Node::column(vec![
            Node::heading("Normal distribution graph"),
            Node::Rule,
            Node::markdown(
                "About 68% of the mass lies within one standard deviation of the mean, \
                 95% within two and 99.7% within three.",
            ),
            Node::row(vec![
                Node::input("normal-distribution-x-mean", "mean", 0),
                Node::input("normal-distribution-x-std", "standard deviation (> 0)", 1),
            ]),
            Node::card("Density", vec![Node::graph("normal-distribution-x-density")]),
        ]),
        callbacks: vec![Callback::new(
            ("normal-distribution-x-density", Prop::Figure),
            &[
                ("normal-distribution-x-mean", Prop::Value),
                ("normal-distribution-x-std", Prop::Value),
            ],
            density,
        )],
    }
}

fn density(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let (Some(mean), Some(std)) = (
        args.first().and_then(stats::number),
        args.get(1).and_then(stats::number),
    ) else {
        return Ok(None);
    };
    if std <= 0.0 {
        return Err(CallbackError::InvalidInput(format!(
            "standard deviation must be > 0, got {std}"
        )));
    }

    let figure = Figure::new(&format!("N(μ = {mean}, σ = {std})"))
        .axes("x", "P(bin)")
        .bars(stats::continuous_bars(
            mean - 4.0 * std,
            mean + 4.0 * std,
            BINS,
            |x| stats::normal_pdf(mean, std, x),
        ));
    Ok(Some(figure.to_value()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_density_is_symmetric() {
        let value = density(&[json!(0), json!(1)]).unwrap().unwrap();
        let figure = Figure::from_value(&value).unwrap();
        assert_eq!(figure.bars.len(), BINS);
        let first = figure.bars[0].value;
        let last = figure.bars[BINS - 1].value;
        assert!((first - last).abs() < 1e-12);
        assert!(figure.bars[BINS / 2].value > first);
    }

    #[test]
    fn test_incomplete_inputs_leave_graph() {
        assert_eq!(density(&[json!(""), json!(1)]), Ok(None));
        assert_eq!(density(&[json!(0)]), Ok(None));
    }

    #[test]
    fn test_non_positive_std_rejected() {
        assert!(matches!(density(&[json!(0), json!(0)]), Err(CallbackError::InvalidInput(_))));
    }
}
