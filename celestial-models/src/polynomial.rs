use crate::error::{ModelError, ModelResult};
use crate::math::power_term;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolyTerm {
    pub p: u32,
    pub q: u32,
    pub coeff: f64,
}

/// SIP-style distortion `(x + A(x, y), y + B(x, y))`.
///
/// The analytical inverse exists only when the reverse coefficients
/// (`AP`, `BP`) have been supplied through [`set_inverse_order`](Self::set_inverse_order).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polynomial2D {
    order: u32,
    a: Vec<PolyTerm>,
    b: Vec<PolyTerm>,
    inverse_order: Option<u32>,
    ap: Vec<PolyTerm>,
    bp: Vec<PolyTerm>,
}

impl Polynomial2D {
    pub fn new(order: u32) -> Self {
        Self {
            order,
            a: Vec::new(),
            b: Vec::new(),
            inverse_order: None,
            ap: Vec::new(),
            bp: Vec::new(),
        }
    }

    pub fn set_a(&mut self, p: u32, q: u32, value: f64) {
        if p + q <= self.order {
            set_term(&mut self.a, p, q, value);
        }
    }

    pub fn set_b(&mut self, p: u32, q: u32, value: f64) {
        if p + q <= self.order {
            set_term(&mut self.b, p, q, value);
        }
    }

    pub fn set_ap(&mut self, p: u32, q: u32, value: f64) {
        if let Some(order) = self.inverse_order {
            if p + q <= order {
                set_term(&mut self.ap, p, q, value);
            }
        }
    }

    pub fn set_bp(&mut self, p: u32, q: u32, value: f64) {
        if let Some(order) = self.inverse_order {
            if p + q <= order {
                set_term(&mut self.bp, p, q, value);
            }
        }
    }

    pub fn set_inverse_order(&mut self, order: u32) {
        self.inverse_order = Some(order);
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[inline]
    pub fn has_inverse(&self) -> bool {
        self.inverse_order.is_some()
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x + eval_poly(&self.a, x, y), y + eval_poly(&self.b, x, y))
    }

    pub fn inverse(&self) -> ModelResult<Self> {
        let inverse_order = self
            .inverse_order
            .ok_or_else(|| ModelError::no_inverse("Polynomial2D"))?;
        Ok(Self {
            order: inverse_order,
            a: self.ap.clone(),
            b: self.bp.clone(),
            inverse_order: Some(self.order),
            ap: self.a.clone(),
            bp: self.b.clone(),
        })
    }
}

fn set_term(terms: &mut Vec<PolyTerm>, p: u32, q: u32, value: f64) {
    terms.retain(|t| !(t.p == p && t.q == q));
    if value != 0.0 {
        terms.push(PolyTerm { p, q, coeff: value });
    }
}

fn eval_poly(terms: &[PolyTerm], x: f64, y: f64) -> f64 {
    terms
        .iter()
        .map(|t| t.coeff * power_term(x, y, t.p, t.q))
        .sum()
}
