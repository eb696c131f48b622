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

use crate::desc::GaugeDesc;
use crate::sample::Sample;
use async_trait::async_trait;

/// Source of metric samples for one scrape.
///
/// `collect` appends to a buffer owned by the caller. If the caller drops the
/// future part-way (a scrape deadline), everything pushed so far is still
/// there to be rendered.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use solana_exporter_metrics::{Collector, GaugeDesc, Sample};
///
/// struct Up(GaugeDesc);
///
/// #[async_trait]
/// impl Collector for Up {
///     fn describe(&self) -> Vec<GaugeDesc> {
///         vec![self.0.clone()]
///     }
///
///     async fn collect(&self, samples: &mut Vec<Sample>) {
///         samples.push(self.0.sample(1.0, &[] as &[&str]));
///     }
/// }
/// ```
#[async_trait]
pub trait Collector: Send + Sync {
    /// Declared families. Each one is registered for every scrape.
    fn describe(&self) -> Vec<GaugeDesc>;

    /// Runs one pass and appends its samples to `samples`.
    async fn collect(&self, samples: &mut Vec<Sample>);
}
