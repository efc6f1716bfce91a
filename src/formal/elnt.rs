//! Elementary number theory: integer residues modulo a prime.
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, Node, NodeKind, Value};
use crate::formal::render::Renderer;
use crate::formal::style::{Form, Mode};
use crate::formal::text::Tex;
use crate::numerical::number_theory::is_prime;

impl Formal {
    /// The class of `residue` modulo the prime `modulus`. Arithmetic on its
    /// value, as in `gamma.pow(k)` with `form: value`, is done modulo
    /// `modulus`.
    pub fn int_residue(residue: i64, modulus: i64) -> FormalResult<Formal> {
        if !is_prime(modulus) {
            return Err(FormalError::UnsupportedOperation(format!(
                "integer residues modulo the non-prime {}",
                modulus
            )));
        }
        Ok(Formal::from_kind(NodeKind::IntResidue { residue, modulus }))
    }
}

impl Renderer {
    /// options: `form` (default name when named, else value), `show-modulus`
    pub(crate) fn format_int_residue(
        &mut self,
        node: &Node,
        residue: i64,
        modulus: i64,
        mode: &Mode,
    ) -> FormalResult<Tex> {
        let opts = mode.options();
        let form = match opts.form()? {
            Some(form) => form,
            None if node.name().is_some() => Form::Name,
            None => Form::Value,
        };
        match form {
            Form::Name => Ok(Tex::math(node.require_name()?)),
            Form::Value | Form::Symbolic => {
                let r = Value::residue(residue, modulus);
                Ok(if opts.get_bool("show-modulus", false)? {
                    Tex::math(format!("{} \\bmod {}", r, modulus))
                } else {
                    Tex::math(r.to_string())
                })
            }
            Form::Verbal => Err(FormalError::UnsupportedOperation(
                "verbal form of an integer residue".to_string(),
            )),
        }
    }
}
