//! Stack headroom for the recursive parser and evaluator.

const RED_ZONE: usize = 128 * 1024;
const STACK_CHUNK: usize = 2 * 1024 * 1024;

/// Runs `f`, first switching to a fresh heap-allocated stack segment when less
/// than the red zone is left on the current one.
pub(crate) fn guarded<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_CHUNK, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u64) -> u64 {
        let padding = std::hint::black_box([0u8; 512]);
        if n == 0 {
            u64::from(padding[0])
        } else {
            guarded(|| depth(n - 1)) + 1 + u64::from(padding[511])
        }
    }

    #[test]
    fn test_guarded_recursion_outgrows_the_thread_stack() {
        // Roughly 100k frames of at least 512 bytes each.
        assert_eq!(depth(100_000), 100_000);
    }
}
