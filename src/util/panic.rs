/// Asserts that the provided block panics. Captured state is wrapped in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe), because the point of most of these tests is
/// to inspect a collection after a panic has unwound through it.
#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run)).is_err(),
            $msg
        );
        println!("^ panic caught");
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
