//! Token pricing
//!
//! Static per-model rates used to estimate the cost of each turn

use std::collections::HashMap;

use crate::models::chat::DEFAULT_MODEL;
use crate::models::Usage;

/// Per-token rates for one model, in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRate {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

impl ModelRate {
    /// Build a rate from prices quoted per thousand tokens
    pub fn per_thousand(input: f64, output: f64) -> Self {
        Self {
            input_per_token: input / 1000.0,
            output_per_token: output / 1000.0,
        }
    }

    pub fn cost(&self, usage: &Usage) -> f64 {
        usage.prompt_tokens as f64 * self.input_per_token
            + usage.completion_tokens as f64 * self.output_per_token
    }
}

/// A model the user can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Models offered for selection
pub const MODEL_CATALOG: &[ModelOption] = &[
    ModelOption { id: "gpt-4", label: "GPT-4 💸💸" },
    ModelOption { id: "o1-preview", label: "GPT-o1 💸" },
    ModelOption { id: DEFAULT_MODEL, label: "GPT-4o" },
    ModelOption { id: "gpt-4o-mini", label: "GPT-4o-mini" },
];

/// Immutable model → rate table
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    rates: HashMap<String, ModelRate>,
}

impl PriceTable {
    pub fn new(rates: HashMap<String, ModelRate>) -> Self {
        Self { rates }
    }

    /// Rates published for the models in `MODEL_CATALOG`
    pub fn builtin() -> Self {
        let rates = [
            ("gpt-4", ModelRate::per_thousand(0.03, 0.06)),
            ("o1-2024-12-17", ModelRate::per_thousand(0.015, 0.06)),
            ("gpt-4o-2024-08-06", ModelRate::per_thousand(0.0025, 0.01)),
            ("gpt-4o-mini", ModelRate::per_thousand(0.00015, 0.0006)),
        ]
        .into_iter()
        .map(|(model, rate)| (model.to_string(), rate))
        .collect();

        Self::new(rates)
    }

    pub fn rate(&self, model: &str) -> Option<&ModelRate> {
        self.rates.get(model)
    }

    /// Cost of one turn; unknown models cost nothing
    pub fn cost(&self, model: &str, usage: &Usage) -> f64 {
        self.rate(model).map(|rate| rate.cost(usage)).unwrap_or(0.0)
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Format a dollar amount the way the cost panel shows it
pub fn format_cost(cost: f64) -> String {
    format!("${:.6}", cost)
}
