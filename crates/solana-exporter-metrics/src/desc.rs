// Copyright 2025 Solana Exporter Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::sample::Sample;
use tracing::warn;

/// Declared gauge family.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeDesc {
    name: &'static str,
    help: String,
    labels: Vec<&'static str>,
}

impl GaugeDesc {
    pub fn new(name: &'static str, help: impl Into<String>, labels: &[&'static str]) -> Self {
        Self {
            name,
            help: help.into(),
            labels: labels.to_vec(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    /// Builds a valid sample. `label_values` pairs positionally with the
    /// declared label names.
    ///
    /// A cardinality mismatch yields an invalid sample instead of a
    /// malformed series.
    pub fn sample<S: AsRef<str>>(&self, value: f64, label_values: &[S]) -> Sample {
        if label_values.len() != self.labels.len() {
            warn!(
                metric = self.name,
                expected = self.labels.len(),
                got = label_values.len(),
                "label cardinality mismatch"
            );
            return Sample::Invalid {
                name: self.name,
                error: format!(
                    "expected {} label values, got {}",
                    self.labels.len(),
                    label_values.len()
                ),
            };
        }

        Sample::Gauge {
            name: self.name,
            labels: self
                .labels
                .iter()
                .zip(label_values)
                .map(|(name, value)| (*name, value.as_ref().to_string()))
                .collect(),
            value,
        }
    }

    /// Builds a boolean sample: `1` for true, `0` for false.
    pub fn flag<S: AsRef<str>>(&self, value: bool, label_values: &[S]) -> Sample {
        self.sample(if value { 1.0 } else { 0.0 }, label_values)
    }

    /// Marks the family as failed for this scrape.
    pub fn invalid(&self, error: &dyn std::fmt::Display) -> Sample {
        Sample::Invalid {
            name: self.name,
            error: error.to_string(),
        }
    }
}
