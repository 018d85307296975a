use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// Input and output do not have the same number of rows.
    #[error("source and destination must have the same number of rows ({0} != {1})")]
    RowCountMismatch(usize, usize),
}

/// Controls how the row loops of an operation are executed.
///
/// The degree of parallelism is always chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every row loop, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    fn pool(n: usize) -> Result<rayon::ThreadPool, ParallelError> {
        if n == 0 {
            return Err(ParallelError::InvalidThreadCount(n));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| ParallelError::BuildError(e.to_string()))
    }
}

/// Apply `f(row_index, row)` to every row of `dst`.
///
/// Each row is owned exclusively by one worker; the call returns once every row has
/// been processed, so consecutive calls form a barrier.
///
/// # Arguments
///
/// * `dst` - The destination buffer in row-major order.
/// * `row_len` - The number of elements in a row.
/// * `strategy` - The execution strategy.
/// * `f` - The operation to run on each row.
pub fn par_rows_mut<T, F>(
    dst: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 || dst.is_empty() {
        return Ok(());
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = ExecutionStrategy::pool(n)?;
            pool.install(|| {
                dst.par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
            });
        }
    }
    Ok(())
}

/// Apply `f(row_index, src_row, dst_row)` to every pair of rows of `src` and `dst`.
///
/// The rows of both buffers may have different lengths but their count must match.
pub fn par_rows_zip<S, T, F>(
    src: &[S],
    src_row_len: usize,
    dst: &mut [T],
    dst_row_len: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    S: Sync,
    T: Send,
    F: Fn(usize, &[S], &mut [T]) + Send + Sync,
{
    if src_row_len == 0 || dst_row_len == 0 {
        return Ok(());
    }

    let (src_rows, dst_rows) = (src.len() / src_row_len, dst.len() / dst_row_len);
    if src_rows != dst_rows {
        return Err(ParallelError::RowCountMismatch(src_rows, dst_rows));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            src.chunks_exact(src_row_len)
                .zip(dst.chunks_exact_mut(dst_row_len))
                .enumerate()
                .for_each(|(y, (s, d))| f(y, s, d));
        }
        ExecutionStrategy::ParallelRows => {
            src.par_chunks_exact(src_row_len)
                .zip(dst.par_chunks_exact_mut(dst_row_len))
                .enumerate()
                .for_each(|(y, (s, d))| f(y, s, d));
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = ExecutionStrategy::pool(n)?;
            pool.install(|| {
                src.par_chunks_exact(src_row_len)
                    .zip(dst.par_chunks_exact_mut(dst_row_len))
                    .enumerate()
                    .for_each(|(y, (s, d))| f(y, s, d));
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0usize; 12];
        par_rows_mut(&mut dst, 4, strategy, |y, row| {
            row.iter_mut().enumerate().for_each(|(x, v)| *v = y * 10 + x);
        })?;
        Ok(dst)
    }

    #[test]
    fn test_rows_serial() -> Result<(), ParallelError> {
        let dst = fill_rows(ExecutionStrategy::Serial)?;
        assert_eq!(dst, vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23]);
        Ok(())
    }

    #[test]
    fn test_rows_strategies_agree() -> Result<(), ParallelError> {
        let serial = fill_rows(ExecutionStrategy::Serial)?;
        assert_eq!(fill_rows(ExecutionStrategy::ParallelRows)?, serial);
        assert_eq!(fill_rows(ExecutionStrategy::Fixed(2))?, serial);
        Ok(())
    }

    #[test]
    fn test_rows_fixed_error() {
        let res = fill_rows(ExecutionStrategy::Fixed(0));
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_rows_empty() -> Result<(), ParallelError> {
        let mut dst: Vec<u8> = vec![];
        par_rows_mut(&mut dst, 0, ExecutionStrategy::ParallelRows, |_, _| {
            unreachable!("no rows to visit")
        })?;
        Ok(())
    }

    #[test]
    fn test_rows_zip() -> Result<(), ParallelError> {
        let src = vec![1u8, 2, 3, 4, 5, 6];
        let mut dst = vec![0u16; 4];
        par_rows_zip(
            &src,
            3,
            &mut dst,
            2,
            ExecutionStrategy::Fixed(2),
            |y, s, d| {
                d[0] = s.iter().map(|&v| v as u16).sum();
                d[1] = y as u16;
            },
        )?;
        assert_eq!(dst, vec![6, 0, 15, 1]);
        Ok(())
    }

    #[test]
    fn test_rows_zip_mismatch() {
        let src = vec![0u8; 6];
        let mut dst = vec![0u8; 6];
        let res = par_rows_zip(&src, 3, &mut dst, 2, ExecutionStrategy::Serial, |_, _, _| {});
        assert_eq!(res, Err(ParallelError::RowCountMismatch(2, 3)));
    }
}
