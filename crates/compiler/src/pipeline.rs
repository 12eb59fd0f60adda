use crate::{
    coerce::number_or_raw,
    error::CompileError,
    report::{CompileReport, StepIssue},
    resolver::{CustomFilterResolver, Trail},
    step::compile_local,
};
use connectors::FilterStore;
use futures::future::{self, BoxFuture, FutureExt};
use model::{Connector, Expression, Pipeline, QueryDocument, Step, StepKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Compiled expression of one step plus issues raised inside any saved
/// filter it expanded.
type StepOutcome = (Option<Expression>, Vec<StepIssue>);

/// Turns pipelines into aggregation expressions.
///
/// Compilation never fails as a whole: a step that cannot be compiled is
/// logged, recorded as an issue and left out of the result.
#[derive(Clone)]
pub struct Compiler {
    resolver: CustomFilterResolver,
}

impl Compiler {
    pub fn new(store: Arc<dyn FilterStore>) -> Self {
        Self {
            resolver: CustomFilterResolver::new(store),
        }
    }

    /// Expression for a single step, or `None` when it is incomplete or
    /// failed to compile.
    pub async fn compile_step(&self, step: &Step) -> Option<Expression> {
        match self.try_compile_step(step, &Trail::new()).await {
            Ok((expression, _)) => expression,
            Err(err) => {
                warn!("Step {} could not be compiled: {}", step.id, err);
                None
            }
        }
    }

    pub async fn compile_pipeline(
        &self,
        steps: &[Step],
        connectors: &[Connector],
    ) -> Option<Expression> {
        self.compile_pipeline_report(steps, connectors)
            .await
            .expression
    }

    pub async fn compile_pipeline_report(
        &self,
        steps: &[Step],
        connectors: &[Connector],
    ) -> CompileReport {
        let trail = Trail::new();
        self.compile_with_trail(steps, connectors, &trail).await
    }

    /// Single `$match` stage, or an empty document when nothing compiled.
    pub async fn compile_query(&self, steps: &[Step], connectors: &[Connector]) -> QueryDocument {
        QueryDocument::from(self.compile_pipeline(steps, connectors).await)
    }

    pub async fn compile(&self, pipeline: &Pipeline) -> CompileReport {
        self.compile_pipeline_report(pipeline.steps(), pipeline.connectors())
            .await
    }

    fn compile_with_trail<'a>(
        &'a self,
        steps: &'a [Step],
        connectors: &'a [Connector],
        trail: &'a Trail,
    ) -> BoxFuture<'a, CompileReport> {
        async move {
            let outcomes =
                future::join_all(steps.iter().map(|step| self.try_compile_step(step, trail))).await;

            let mut compiled = Vec::with_capacity(steps.len());
            let mut issues = Vec::new();

            for (index, (step, outcome)) in steps.iter().zip(outcomes).enumerate() {
                match outcome {
                    Ok((expression, nested)) => {
                        issues.extend(nested);
                        match expression {
                            Some(expression) => compiled.push((index, expression)),
                            None => debug!("Step {} at index {} is incomplete", step.id, index),
                        }
                    }
                    Err(error) => {
                        warn!(
                            "Step {} at index {} could not be compiled: {}",
                            step.id, index, error
                        );
                        issues.push(StepIssue {
                            step_id: step.id.clone(),
                            index,
                            filter: trail.ids().last().cloned(),
                            error,
                        });
                    }
                }
            }

            debug!("Compiled {} of {} steps", compiled.len(), steps.len());
            CompileReport {
                expression: fold(compiled, connectors),
                issues,
            }
        }
        .boxed()
    }

    async fn try_compile_step(
        &self,
        step: &Step,
        trail: &Trail,
    ) -> Result<StepOutcome, CompileError> {
        let StepKind::CustomFilterRef {
            filter_id,
            parent_operator,
            parent_value,
            ..
        } = &step.kind
        else {
            return compile_local(step).map(|expression| (expression, Vec::new()));
        };

        if step.label.trim().is_empty() && step.field_name.trim().is_empty() {
            return Ok((None, Vec::new()));
        }

        let filter = self.resolver.fetch(filter_id, trail).await?;
        let nested = trail.extended(filter_id);
        let report = self
            .compile_with_trail(&filter.steps, &filter.operators, &nested)
            .await;

        let expression = report.expression.map(|resolved| match parent_operator {
            Some(code) => {
                let mut args = vec![resolved];
                if let Some(value) = parent_value {
                    args.push(number_or_raw(value));
                }
                Expression::call(code.symbol(), args)
            }
            None => resolved,
        });

        Ok((expression, report.issues))
    }
}

/// Left-associative fold. The connector before the step at original index
/// `i` is `connectors[i - 1]`, `AND` when missing.
fn fold(compiled: Vec<(usize, Expression)>, connectors: &[Connector]) -> Option<Expression> {
    let mut compiled = compiled.into_iter();
    let (_, first) = compiled.next()?;

    Some(compiled.fold(first, |acc, (index, next)| {
        let connector = index
            .checked_sub(1)
            .and_then(|i| connectors.get(i))
            .copied()
            .unwrap_or_default();
        Expression::call(connector.symbol(), vec![acc, next])
    }))
}
