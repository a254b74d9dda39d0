//! Internal functions that are used by tests - can be changed anytime

use crate::Error;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::OnceLock;

/// The thread pool used by the library, created on first use.
static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Create the thread pool with the given count of threads. Fails if the pool already exists.
pub(crate) fn init_thread_pool(num_threads: usize) -> Result<(), Error> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|idx| format!("randomness-worker-{idx}"))
        .build()?;

    THREAD_POOL.set(pool).map_err(|_| {
        Error::InvalidParameter("the thread pool is already initialised".to_owned())
    })
}

/// Returns the thread pool, initialising it with one thread per logical CPU if necessary.
pub(crate) fn thread_pool() -> Result<&'static ThreadPool, Error> {
    if let Some(pool) = THREAD_POOL.get() {
        return Ok(pool);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .thread_name(|idx| format!("randomness-worker-{idx}"))
        .build()?;

    // another thread may have won the race, its pool is used then
    Ok(THREAD_POOL.get_or_init(|| pool))
}

/// The [complementary error function](https://en.wikipedia.org/wiki/Error_function)
#[inline]
pub(crate) fn erfc(value: f64) -> f64 {
    statrs::function::erf::erfc(value)
}

/// The regularized upper incomplete gamma function Q(a, x).
///
/// `a` has to be positive, `x` must not be negative. For `x == 0`, the result is exactly 1.
pub(crate) fn igamc(a: f64, x: f64) -> Result<f64, Error> {
    check_f64(a)?;
    check_f64(x)?;

    if a <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "igamc: a has to be positive, is {a}"
        )));
    }
    if x < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "igamc: x must not be negative, is {x}"
        )));
    }
    if x == 0.0 {
        return Ok(1.0);
    }

    let value = statrs::function::gamma::checked_gamma_ur(a, x)?;
    check_f64(value)?;
    Ok(value)
}

/// The confluent hypergeometric function of the first kind, 1F1(a; b; x), as Kummer series.
///
/// Only meant for the small arguments used in the overlapping template matching test: the series
/// is summed until the terms no longer change the result. `None` if the series does not converge
/// to a finite value, e.g. for large `x`.
pub(crate) fn hyp1f1(a: f64, b: f64, x: f64) -> Option<f64> {
    const MAX_TERMS: usize = 10_000;

    let mut term = 1.0;
    let mut sum = 1.0;

    for k in 0..MAX_TERMS {
        let k = k as f64;
        term *= (a + k) / (b + k) * x / (k + 1.0);
        sum += term;

        if !sum.is_finite() {
            return None;
        }
        if term.abs() <= f64::EPSILON * sum.abs() {
            return Some(sum);
        }
    }

    None
}

/// Check if a f64 is "normal", meaning not NaN and not Infinite.
#[inline]
pub(crate) fn check_f64(value: f64) -> Result<(), Error> {
    if value.is_nan() {
        Err(Error::NaN)
    } else if value.is_infinite() {
        Err(Error::Infinite)
    } else {
        Ok(())
    }
}

/// Checked add with overflow info: checked_add!(a, b) returns `Result<_, Error>`
macro_rules! checked_add {
    ($a: expr, $b: expr) => {{
        let (a, b) = ($a, $b);
        a.checked_add(b).ok_or_else(|| {
            $crate::Error::Overflow(format!(
                "adding {} and {} (at {}:{})",
                a,
                b,
                file!(),
                line!()
            ))
        })
    }};
}

pub(crate) use checked_add;
