/// Evaluates an expression and returns its value together with the elapsed
/// wall-clock time.
#[macro_export]
macro_rules! measure_time {
    ($func:expr) => {{
        let start = ::std::time::Instant::now();
        let result = $func;
        let duration = start.elapsed();
        (result, duration)
    }};
}
