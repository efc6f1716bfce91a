use num::integer::gcd;

/// Deterministic trial division; everything below 2 is not prime.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut k: i64 = 5;
    while k.saturating_mul(k) <= n {
        if n % k == 0 || n % (k + 2) == 0 {
            return false;
        }
        k += 6;
    }
    true
}

/// distinct prime factors in increasing order
pub fn prime_factors(n: i64) -> Vec<i64> {
    let mut factors = Vec::new();
    let mut n = n.abs();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Euler's phi; 0 for non-positive arguments
pub fn totient(n: i64) -> i64 {
    if n < 1 {
        return 0;
    }
    prime_factors(n)
        .iter()
        .fold(n, |acc, p| acc / p * (p - 1))
}

pub fn mod_pow(base: i64, exp: u64, modulus: i64) -> i64 {
    let m = modulus as i128;
    let mut b = (base as i128).rem_euclid(m);
    let mut e = exp;
    let mut acc: i128 = 1 % m;
    while e > 0 {
        if e & 1 == 1 {
            acc = acc * b % m;
        }
        b = b * b % m;
        e >>= 1;
    }
    acc as i64
}

/// The least primitive root modulo `m`, if there is one.
pub fn primitive_root(m: i64) -> Option<i64> {
    if m < 2 {
        return None;
    }
    let phi = totient(m);
    let factors = prime_factors(phi);
    (1..m)
        .filter(|g| gcd(*g, m) == 1)
        .find(|g| {
            factors
                .iter()
                .all(|q| mod_pow(*g, (phi / q) as u64, m) != 1)
        })
}

/// Primitive roots other than the least one.
///
/// With `g` the least primitive root and `u_0 < u_1 < ...` the units modulo
/// `phi(modulus)`, returns `g^(u_k)` for `k = auto_power mod phi(phi(modulus))`.
/// For `modulus = 13` this cycles through 2, 6, 11, 7.
pub fn pick_primitive_root(modulus: i64, auto_power: u64) -> Option<i64> {
    let g = primitive_root(modulus)?;
    if auto_power == 0 {
        return Some(g);
    }
    let t = totient(modulus);
    let s = totient(t) as u64;
    let k = (auto_power % s) as usize;
    let u = (1..t.max(2)).filter(|u| gcd(*u, t) == 1).nth(k)?;
    Some(mod_pow(g, u as u64, modulus))
}
