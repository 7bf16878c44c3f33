//! Scoped context selection.

use crate::context::ExecutionContext;
use crate::immediate::ImmediateContext;
use crate::options::ExecOptions;
use crate::pooled::PooledContext;
use exec0::error::ExecError;
use exec0::hook::ResultHook;
use exec0::pool::PoolConnector;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Run `body` inside the execution context described by `options`.
///
/// When `options.parallel` is false the body gets an
/// [`ExecutionContext::Immediate`] and `connector` is never used. Otherwise
/// the pool parameters are normalized, validated by the connector, and a
/// pool is opened before `body` runs; a configuration or connection
/// failure is returned without running it.
///
/// However `body` ends (success, error or panic), every job it submitted
/// is drained through the hook and the pool is closed before this
/// returns. Errors are reported with this precedence:
///
/// 1. a panic in `body` is resumed after cleanup;
/// 2. an error from `body` is returned, and a drain failure is logged;
/// 3. otherwise a drain or close failure is returned.
///
/// ```no_run
/// # async fn run() -> Result<(), exec0::ExecError> {
/// use connectome_exec::{ExecOptions, in_context};
/// use connectome_pool_local::LocalConnector;
/// use exec0::{ExecError, HookError, PoolParams, ResultHook, TaskError};
///
/// fn rewire((split,): (u64,)) -> Result<u64, TaskError> {
///     Ok(split * 10)
/// }
///
/// let options = ExecOptions::parallel(PoolParams::new().with("n_workers", "4"));
/// let hook: Box<dyn ResultHook<u64, u64>> = Box::new(|edges: u64, split: u64| -> Result<(), HookError> {
///     println!("split {split}: {edges} edges");
///     Ok(())
/// });
///
/// in_context(&options, &LocalConnector, Some(hook), async |ctx| -> Result<(), ExecError> {
///     for split in 0..8 {
///         ctx.submit(rewire, (split,), split)?;
///     }
///     Ok(())
/// })
/// .await
/// # }
/// ```
pub async fn in_context<C, R, M, T, E, B>(
    options: &ExecOptions,
    connector: &C,
    hook: Option<Box<dyn ResultHook<R, M>>>,
    body: B,
) -> Result<T, E>
where
    C: PoolConnector,
    R: Send + 'static,
    M: Send + 'static,
    E: From<ExecError>,
    B: AsyncFnOnce(&mut ExecutionContext<C::Pool, R, M>) -> Result<T, E>,
{
    tracing::info!(parallel = options.parallel, "starting execution context");
    if !options.parallel {
        let mut ctx = ExecutionContext::Immediate(ImmediateContext::new(hook));
        return body(&mut ctx).await;
    }

    let params = options.pool.normalize();
    let settings = connector.configure(&params).map_err(ExecError::from)?;
    let pool = connector.connect(settings).await.map_err(ExecError::from)?;
    let pooled = PooledContext::new(pool, hook).with_drain_interval(options.drain_interval);
    let mut ctx = ExecutionContext::Pooled(pooled);

    let outcome = AssertUnwindSafe(body(&mut ctx)).catch_unwind().await;
    let finished = ctx.finish().await;

    match outcome {
        Err(panic) => {
            if let Err(error) = finished {
                tracing::error!(error = %error, "final drain failed while unwinding");
            }
            std::panic::resume_unwind(panic)
        }
        Ok(Err(error)) => {
            if let Err(drain_error) = finished {
                tracing::error!(error = %drain_error, "final drain failed after driver error");
            }
            Err(error)
        }
        Ok(Ok(value)) => {
            finished?;
            Ok(value)
        }
    }
}
