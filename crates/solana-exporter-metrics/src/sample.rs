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

/// One observation of a gauge family for the current scrape.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Gauge {
        name: &'static str,
        labels: Vec<(&'static str, String)>,
        value: f64,
    },
    /// The family could not be observed; `error` says why.
    Invalid { name: &'static str, error: String },
}

impl Sample {
    pub fn name(&self) -> &'static str {
        match self {
            Sample::Gauge { name, .. } | Sample::Invalid { name, .. } => name,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Sample::Gauge { value, .. } => Some(*value),
            Sample::Invalid { .. } => None,
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        match self {
            Sample::Gauge { labels, .. } => labels
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.as_str()),
            Sample::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Sample::Invalid { error, .. } => Some(error),
            Sample::Gauge { .. } => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Sample::Invalid { .. })
    }
}
