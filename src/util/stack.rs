/// Stack space that must remain before a recursive step runs without growing
/// the stack first.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if less than the red zone
/// is left on the current one.
///
/// Wrap every function through which the interpreter recurses once per level
/// of nesting or per call.
///
/// # Example
/// ```
/// use sprig::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u64) -> u64 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_recursion_on_a_small_thread() {
        fn count_down(n: u32) -> u32 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { count_down(n - 1) + 1 })
        }

        let handle = std::thread::Builder::new().stack_size(256 * 1024)
                                                .spawn(|| count_down(50_000))
                                                .unwrap();
        assert_eq!(handle.join().unwrap(), 50_000);
    }

    #[test]
    fn passes_the_result_through() {
        let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }
}
