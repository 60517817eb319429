/// A one-line ternary.  `cargo fmt` splits `if` expressions across
/// five lines, and the border rules for the gradient and the seam
/// recurrence (clamp left, clamp right, clamp top, clamp bottom) read
/// far better as a compact table of `cq!` calls.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
