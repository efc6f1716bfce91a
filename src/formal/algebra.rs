//! Algebraic structures: groups, rings, fields, the rational numbers,
//! primitive roots of unity, cyclotomic fields and their Galois groups.
//!
//! Besides rendering themselves, cyclotomic fields of prime order can build
//! formal representations of a generic element, of their underlying set, and
//! of the underlying set of their Galois group over the rationals:
//!
//! ```text
//! a_{0} + a_{1} \zeta + a_{2} \zeta^{2} + \cdots + a_{p - 2} \zeta^{p - 2}
//! \left\{ \sigma_{r} : 1 \leq r \leq p - 1 \right\}
//! ```
use crate::formal::errors::{FormalError, FormalResult};
use crate::formal::node::{Formal, LookupTable, MappingData, Node, NodeKind, Operand, ooo};
use crate::formal::path::ExpressionPath;
use crate::formal::render::Renderer;
use crate::formal::rules::RuleTable;
use crate::formal::style::{Form, Mode, Modifier, Style, StyleValue};
use crate::formal::text::Tex;
use crate::numerical::nice_random::{NiceRandomRationals, RationalSource};
use crate::numerical::number_theory::pick_primitive_root;
use crate::style;
use log::{debug, info};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    Group,
    Ring,
    Field,
    RationalNumbers,
}

#[derive(Debug, Clone)]
pub struct CyclotomicData {
    /// `m` for the m-th cyclotomic field
    pub order: Option<Formal>,
    /// a primitive m-th root of unity
    pub generator: Option<Formal>,
    pub basefield: Formal,
}

thread_local! {
    static QQ: Formal = Formal::from_kind(NodeKind::Structure(StructureKind::RationalNumbers))
        .named("\\mathbb{Q}")
        .with_id("QQ");
}

/// the rational numbers, one shared node per thread
pub fn qq() -> Formal {
    QQ.with(|q| q.clone())
}

fn integer_value(f: &Formal) -> Option<i64> {
    match f.kind() {
        NodeKind::Integer(d) => d.value,
        _ => None,
    }
}

impl Formal {
    pub fn group(name: &str) -> Formal {
        Formal::from_kind(NodeKind::Structure(StructureKind::Group)).named(name)
    }

    pub fn ring(name: &str) -> Formal {
        Formal::from_kind(NodeKind::Structure(StructureKind::Ring)).named(name)
    }

    pub fn field(name: &str) -> Formal {
        Formal::from_kind(NodeKind::Structure(StructureKind::Field)).named(name)
    }

    /// A primitive root of unity named `\zeta`, of order `order` if given.
    pub fn primitive_root_of_unity(order: Option<Formal>) -> Formal {
        Formal::from_kind(NodeKind::PrimitiveRootOfUnity { order }).named("\\zeta")
    }

    /// The m-th cyclotomic field over the rationals. Its generator is a
    /// primitive root of unity sharing the order node `m`.
    pub fn cyclotomic_field(m: impl Into<Formal>) -> Formal {
        let m = m.into();
        let generator = Formal::primitive_root_of_unity(Some(m.clone()));
        Formal::from_kind(NodeKind::CyclotomicField(CyclotomicData {
            order: Some(m),
            generator: Some(generator),
            basefield: qq(),
        }))
    }

    /// The rationals adjoined a primitive root of unity; the field's order
    /// is the root's order.
    pub fn cyclotomic_field_generated_by(generator: Formal) -> FormalResult<Formal> {
        let order = match generator.kind() {
            NodeKind::PrimitiveRootOfUnity { order } => order.clone(),
            _ => {
                return Err(FormalError::UnsupportedOperation(format!(
                    "adjoining a {} to the rationals",
                    generator.node_type()
                )));
            }
        };
        Ok(Formal::from_kind(NodeKind::CyclotomicField(CyclotomicData {
            order,
            generator: Some(generator),
            basefield: qq(),
        })))
    }

    /// "a cyclotomic field", with neither order nor generator
    pub fn generic_cyclotomic_field() -> Formal {
        Formal::from_kind(NodeKind::CyclotomicField(CyclotomicData {
            order: None,
            generator: None,
            basefield: qq(),
        }))
    }

    /// The Galois group of `ext` over `base`, by default over the rationals.
    pub fn galois_group(ext: Formal, base: Option<Formal>) -> Formal {
        Formal::from_kind(NodeKind::GaloisGroup {
            ext,
            base: base.unwrap_or_else(qq),
        })
    }

    fn cyclotomic_data(&self) -> FormalResult<&CyclotomicData> {
        match self.kind() {
            NodeKind::CyclotomicField(data) => Ok(data),
            _ => Err(FormalError::UnsupportedOperation(format!(
                "{} is not a cyclotomic field",
                self.node_type()
            ))),
        }
    }

    /// Order and generator of a cyclotomic field whose order is known to
    /// be prime.
    fn prime_cyclotomic(&self) -> FormalResult<(&Formal, &Formal)> {
        let data = self.cyclotomic_data()?;
        match (&data.order, &data.generator) {
            (Some(m), Some(generator)) if is_prime_order(m) => Ok((m, generator)),
            _ => Err(FormalError::UnsupportedOperation(
                "cyclotomic field whose order is not known to be prime".to_string(),
            )),
        }
    }

    /// A generic element: a sum of coefficients times powers of the
    /// generator, usually with an elision.
    pub fn build_formal_element(&self, opts: &ElementOptions) -> FormalResult<Formal> {
        let (m, generator) = self.prime_cyclotomic()?;
        let i = opts
            .coeff_index
            .clone()
            .unwrap_or_else(|| Formal::variable("i"));
        let coeff = match (&opts.coeff_form, opts.random_coeffs) {
            (Some(form), _) => form.clone(),
            (None, true) => {
                let source = opts
                    .coeff_source
                    .clone()
                    .unwrap_or_else(|| Rc::new(NiceRandomRationals::default()));
                let table =
                    LookupTable::function(move |_| Operand::Node(Formal::from(source.next_rational())));
                Formal::lookup(vec![i.clone()], table)
            }
            (None, false) => Formal::string(&opts.coeff_base).subscript(i.clone()),
        };
        let term = coeff * generator.clone().pow(i.clone());

        let mval = integer_value(m);
        let mut elide_after = opts.elide_after;
        match mval {
            // at most m - 4 terms before the ellipsis
            Some(v) => elide_after = elide_after.min(v - 4),
            // without a value the terms cannot all be written out
            None if elide_after < 1 => elide_after = 3,
            None => {}
        }
        let range: Vec<Operand> = if elide_after > 0 {
            if opts.falling_powers {
                (0..elide_after)
                    .map(|k| Operand::from(m.clone() - (k + 2)))
                    .chain([Operand::from(ooo()), Operand::from(0)])
                    .collect()
            } else {
                (0..elide_after)
                    .map(Operand::from)
                    .chain([Operand::from(ooo()), Operand::from(m.clone() - 2)])
                    .collect()
            }
        } else {
            let mval = mval.ok_or_else(|| {
                FormalError::UndefinedValue("order of the cyclotomic field".to_string())
            })?;
            let powers = 0..mval - 1;
            if opts.falling_powers {
                powers.rev().map(Operand::from).collect()
            } else {
                powers.map(Operand::from).collect()
            }
        };
        debug!("formal element over {} range entries", range.len());
        Ok(Formal::range_sum(range, Some(term), Some(i), None))
    }

    /// The underlying set: a generic element whose coefficients are
    /// rational. Random coefficients are switched off.
    pub fn build_formal_set(&self, opts: &ElementOptions) -> FormalResult<Formal> {
        let opts = ElementOptions {
            random_coeffs: false,
            ..opts.clone()
        };
        let alpha = self.build_formal_element(&opts)?;
        let coeff = match alpha.generic_term().map(|t| t.kind()) {
            Some(NodeKind::Product(factors)) if !factors.is_empty() => factors[0].clone(),
            _ => {
                return Err(FormalError::UnsupportedOperation(
                    "element without a coefficient".to_string(),
                ));
            }
        };
        let cond = coeff.is_in(qq());
        Ok(Formal::set(vec![alpha], Some(cond)))
    }

    /// The automorphisms `\sigma_r : \zeta \mapsto \zeta^r`, `1 \leq r \leq
    /// m - 1`, of a cyclotomic field of prime order `m`, as a range set.
    ///
    /// options: `generator` (integer, or `auto` for a primitive root
    /// modulo m), `auto-power` (which primitive root `auto` picks).
    /// With a generator `g` the automorphisms are indexed as
    /// `\zeta \mapsto \zeta^{\gamma^k}` with `\gamma = g mod m`.
    pub fn build_galois_group_underlying_set(&self, options: &Style) -> FormalResult<Formal> {
        let (m, generator) = self.prime_cyclotomic()?;
        let sigma = Formal::string("\\sigma");
        let range = vec![
            Operand::from(1),
            Operand::from(2),
            Operand::from(ooo()),
            Operand::from(m.clone() - 1),
        ];
        let (index, power) = match generator_option(options, m)? {
            None => {
                let r = Formal::variable("r");
                (r.clone(), r)
            }
            Some(g) => {
                let mval = integer_value(m).ok_or_else(|| {
                    FormalError::UndefinedValue("order of the cyclotomic field".to_string())
                })?;
                info!("Galois group of the {}-th cyclotomic field generated by {}", mval, g);
                let gamma = Formal::int_residue(g, mval)?
                    .named("\\gamma")
                    .with_id("gamma");
                let k = Formal::variable("k");
                (k.clone(), gamma.pow(k))
            }
        };
        let elt = Formal::mapping(MappingData {
            name_form: Some(sigma.subscript(index.clone())),
            domain: Some(self.clone()),
            codomain: Some(self.clone()),
            args: vec![generator.clone()],
            value_form: Some(generator.clone().pow(power)),
        });
        Ok(Formal::range_set(range, Some(elt), Some(index), None))
    }
}

fn is_prime_order(m: &Formal) -> bool {
    matches!(m.kind(), NodeKind::Integer(d) if d.prime == Some(true))
}

fn generator_option(options: &Style, m: &Formal) -> FormalResult<Option<i64>> {
    match options.get("generator") {
        None => Ok(None),
        Some(StyleValue::Int(g)) => Ok(Some(*g)),
        Some(StyleValue::Str(s)) if s == "auto" => {
            let mval = integer_value(m).ok_or_else(|| {
                FormalError::UndefinedValue("order of the cyclotomic field".to_string())
            })?;
            let auto_power = options.get_int("auto-power", 0)?;
            let auto_power =
                u64::try_from(auto_power).map_err(|_| FormalError::invalid_option("auto-power", auto_power))?;
            pick_primitive_root(mval, auto_power)
                .map(Some)
                .ok_or_else(|| FormalError::UndefinedValue(format!("primitive root modulo {}", mval)))
        }
        Some(StyleValue::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| FormalError::invalid_option("generator", s)),
        Some(other) => Err(FormalError::invalid_option("generator", other)),
    }
}

/// How [`Formal::build_formal_element`] writes coefficients and terms.
#[derive(Clone)]
pub struct ElementOptions {
    /// Coefficient expression; it should contain `coeff_index`.
    pub coeff_form: Option<Formal>,
    /// the iteration variable, `i` by default
    pub coeff_index: Option<Formal>,
    /// Without a `coeff_form`: random rational coefficients instead of
    /// `coeff_base` subscripted by the index.
    pub random_coeffs: bool,
    pub coeff_base: String,
    /// Terms written before the ellipsis; 0 writes all terms out.
    pub elide_after: i64,
    /// high powers of the generator first
    pub falling_powers: bool,
    /// where random coefficients come from; nice random rationals if unset
    pub coeff_source: Option<Rc<dyn RationalSource>>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        ElementOptions {
            coeff_form: None,
            coeff_index: None,
            random_coeffs: false,
            coeff_base: "a".to_string(),
            elide_after: 3,
            falling_powers: false,
            coeff_source: None,
        }
    }
}

impl fmt::Debug for ElementOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementOptions")
            .field("coeff_form", &self.coeff_form)
            .field("coeff_index", &self.coeff_index)
            .field("random_coeffs", &self.random_coeffs)
            .field("coeff_base", &self.coeff_base)
            .field("elide_after", &self.elide_after)
            .field("falling_powers", &self.falling_powers)
            .field("coeff_source", &self.coeff_source.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Renderer {
    /// options: `form` (default name). Roles: `order`.
    pub(crate) fn format_root_of_unity<'a>(
        &mut self,
        node: &'a Node,
        order: Option<&'a Formal>,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let form = mode.options().form_or(Form::Name)?;
        if form == Form::Name {
            return Ok(Tex::math(node.require_name()?));
        }
        if form == Form::Verbal {
            return Ok(match order {
                None => Tex::plain("a primitive root of unity"),
                Some(m) => {
                    let ordinal = Modifier::Merge(style! {"ordinal" => true});
                    let m = self.fwd(node, m, "order", rules, path, Some(&ordinal))?;
                    Tex::plain("a primitive ")
                        .concat(m)
                        .then_plain(" root of unity")
                }
            });
        }
        let m = order.ok_or_else(|| {
            FormalError::UndefinedValue("order of the root of unity".to_string())
        })?;
        let m = self.fwd(node, m, "order", rules, path, None)?;
        Ok(if form == Form::Symbolic {
            Tex::math(node.require_name()?)
                .then_math("_{")
                .concat(m)
                .then_math("}")
        } else {
            Tex::math(format!("\\mathrm{{e}}^{{2\\pi i/{}}}", m))
        })
    }

    /// options: `form` (default name; value and symbolic both give
    /// `\mathbb{Q}(\zeta)`). Roles: `basefield`, `gen`, `order`.
    pub(crate) fn format_cyclotomic_field<'a>(
        &mut self,
        node: &'a Node,
        data: &'a CyclotomicData,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        match mode.options().form_or(Form::Name)? {
            Form::Name => Ok(Tex::math(node.require_name()?)),
            Form::Value | Form::Symbolic => {
                let generator = data.generator.as_ref().ok_or_else(|| {
                    FormalError::UndefinedValue("generator of the cyclotomic field".to_string())
                })?;
                let basefield = self.fwd(node, &data.basefield, "basefield", rules, path, None)?;
                let generator = self.fwd(node, generator, "gen", rules, path, None)?;
                Ok(basefield.then_math("(").concat(generator).then_math(")"))
            }
            Form::Verbal => match &data.order {
                None => Ok(Tex::plain("a cyclotomic field")),
                Some(m) => {
                    let ordinal = Modifier::Merge(style! {"ordinal" => true});
                    let m = self.fwd(node, m, "order", rules, path, Some(&ordinal))?;
                    Ok(Tex::plain("the ")
                        .concat(m)
                        .then_plain(" cyclotomic field"))
                }
            },
        }
    }

    /// options: `form` (default name). With `form: value` the group is
    /// written as its underlying set, built by the extension field from the
    /// mode resolved for role `uset`. Roles: `ext`, `base`, `uset`.
    pub(crate) fn format_galois_group<'a>(
        &mut self,
        node: &'a Node,
        ext: &'a Formal,
        base: &'a Formal,
        mode: &Mode,
        rules: Option<&RuleTable>,
        path: &ExpressionPath<'a>,
    ) -> FormalResult<Tex> {
        let form = mode.options().form_or(Form::Name)?;
        match form {
            Form::Name => return Ok(Tex::math(node.require_name()?)),
            Form::Value => {
                let uset_mode = self.fwd_mode(node, node, "uset", rules, path)?;
                let uset = ext.build_galois_group_underlying_set(uset_mode.options())?;
                let uset_path = path.extended(node, "uset");
                return self.format(&uset, None, rules, &uset_path, None);
            }
            Form::Symbolic | Form::Verbal => {}
        }
        let e = self.fwd(node, ext, "ext", rules, path, None)?;
        let b = self.fwd(node, base, "base", rules, path, None)?;
        Ok(if form == Form::Symbolic {
            Tex::math("\\Gal(")
                .concat(e)
                .then_math("/")
                .concat(b)
                .then_math(")")
        } else {
            Tex::plain("the Galois group of ")
                .concat(e)
                .then_plain(" over ")
                .concat(b)
        })
    }
}
