//! Numeric helpers used when building algebraic examples: primality,
//! totients and primitive roots, and "nice" random numbers of the kind one
//! writes on a chalkboard.
/// primality, Euler's totient, primitive roots
pub mod number_theory;
/// random integers and rationals that look like hand-picked examples
pub mod nice_random;
