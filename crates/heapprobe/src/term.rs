/// Returns the `n`th term of the recurrence t(1) = 0, t(2) = 1,
/// t(k) = t(k-1) + t(k-2), wrapping on overflow.
///
/// For `n < 3` the loop never runs and the seed "next term" `1` is returned,
/// so `nth_term(1) == nth_term(2) == 1`.
pub fn nth_term(n: u32) -> u64 {
    let mut t1: u64 = 0;
    let mut t2: u64 = 1;
    let mut next = t1.wrapping_add(t2);

    for _ in 3..n {
        t1 = t2;
        t2 = next;
        next = t1.wrapping_add(t2);
    }
    next
}
