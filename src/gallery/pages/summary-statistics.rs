//! Summary statistics and a histogram for a list of numbers typed by the user.

use serde_json::Value;

use crate::core::callbacks::{Callback, CallbackError, Prop};
use crate::core::figure::Figure;
use crate::core::layout::Node;
use crate::core::registry::ExampleApp;
use crate::gallery::stats;

const BINS: usize = 8;

pub fn app() -> ExampleApp {
    ExampleApp {
        title: "Summary statistics".to_string(),
        description: "Type a list of numbers and see its mean, median, spread and \
                      histogram update as you go."
            .to_string(),
        layout: Node::column(vec![
            Node::heading("Summary statistics"),
            Node::Rule,
            Node::input(
                "summary-statistics-x-data",
                "numbers, separated by commas",
                "2, 4, 4, 4, 5, 5, 7, 9",
            ),
            Node::row(vec![
                Node::card("Summary", vec![Node::output("summary-statistics-x-summary")]),
                Node::card("Histogram", vec![Node::graph("summary-statistics-x-histogram")]),
            ]),
        ]),
        callbacks: vec![
            Callback::new(
                ("summary-statistics-x-summary", Prop::Children),
                &[("summary-statistics-x-data", Prop::Value)],
                summary,
            ),
            Callback::new(
                ("summary-statistics-x-histogram", Prop::Figure),
                &[("summary-statistics-x-data", Prop::Value)],
                histogram,
            ),
        ],
    }
}

fn values(args: &[Value]) -> Result<Vec<f64>, CallbackError> {
    let text = match args.first() {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    stats::parse_list(&text)
        .map_err(|token| CallbackError::InvalidInput(format!("'{token}' is not a number")))
}

fn summary(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let values = values(args)?;
    let (Some(mean), Some(median), Some(std)) = (
        stats::mean(&values),
        stats::median(&values),
        stats::std_dev(&values),
    ) else {
        return Ok(Some(Value::String("*No data.*".to_string())));
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let text = format!(
        "- **Count** {}\n- **Mean** {mean:.3}\n- **Median** {median:.3}\n- **Std** {std:.3}\n- **Range** {} to {}",
        values.len(),
        stats::label(min),
        stats::label(max),
    );
    Ok(Some(Value::String(text)))
}

fn histogram(args: &[Value]) -> Result<Option<Value>, CallbackError> {
    let values = values(args)?;
    if values.is_empty() {
        return Ok(None);
    }
    let bars = stats::histogram(&values, BINS)
        .into_iter()
        .map(|(start, count)| (stats::label(start), count as f64));
    let figure = Figure::new("Histogram").axes("value", "count").bars(bars);
    Ok(Some(figure.to_value()?))
}
