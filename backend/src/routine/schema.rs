//! Argument schemas
//!
//! Binds raw host input to named parameters following the host's calling
//! convention: positional arguments fill the positional-or-keyword names in
//! order, keywords may name any parameter, and keyword-only parameters can
//! never be given positionally.

use crate::bridge::CallArgs;
use crate::error::IntegrationError;

use super::Routine;

/// Parameter layout of one routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineSchema {
    pub routine: &'static str,
    /// Positional-or-keyword names, in order
    pub positional: &'static [&'static str],
    /// Leading positional names that must be supplied
    pub required: usize,
    pub keyword_only: &'static [&'static str],
}

static GAUSS_KRONROD: RoutineSchema = RoutineSchema {
    routine: "gauss_kronrod",
    positional: &["f", "a", "b", "args", "kwargs"],
    required: 3,
    keyword_only: &["full_output", "max_levels", "tolerance", "points"],
};

static TANH_SINH: RoutineSchema = RoutineSchema {
    routine: "tanh_sinh",
    positional: &["f", "a", "b", "args", "kwargs"],
    required: 3,
    keyword_only: &["full_output", "max_levels", "tolerance"],
};

static SINH_SINH: RoutineSchema = RoutineSchema {
    routine: "sinh_sinh",
    positional: &["f"],
    required: 1,
    keyword_only: &["args", "kwargs", "full_output", "max_levels", "tolerance"],
};

static EXP_SINH: RoutineSchema = RoutineSchema {
    routine: "exp_sinh",
    positional: &["f", "b", "args", "kwargs", "interval_infinity"],
    required: 2,
    keyword_only: &["full_output", "max_levels", "tolerance"],
};

static TRAPEZOIDAL: RoutineSchema = RoutineSchema {
    routine: "trapezoidal",
    positional: &["f", "a", "b", "args", "kwargs"],
    required: 3,
    keyword_only: &["full_output", "max_levels", "tolerance"],
};

impl RoutineSchema {
    pub fn of(routine: Routine) -> &'static RoutineSchema {
        match routine {
            Routine::GaussKronrod => &GAUSS_KRONROD,
            Routine::TanhSinh => &TANH_SINH,
            Routine::SinhSinh => &SINH_SINH,
            Routine::ExpSinh => &EXP_SINH,
            Routine::Trapezoidal => &TRAPEZOIDAL,
        }
    }

    /// All parameter names, positional first
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.positional.iter().chain(self.keyword_only).copied()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names().position(|n| n == name)
    }

    /// Bind raw input to this schema's names
    ///
    /// # Errors
    ///
    /// `ArgumentParse` for too many positionals, a repeated or unknown
    /// keyword, a keyword that repeats a positional, or a missing required
    /// argument.
    pub fn bind<O, E>(&'static self, input: CallArgs<O>) -> Result<BoundArguments<O>, IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        let CallArgs {
            positional,
            keywords,
        } = input;

        if positional.len() > self.positional.len() {
            return Err(IntegrationError::parse(
                self.routine,
                self.too_many_positionals(positional.len()),
            ));
        }

        let mut slots: Vec<Option<O>> = self.names().map(|_| None).collect();
        for (slot, value) in slots.iter_mut().zip(positional) {
            *slot = Some(value);
        }

        for (name, value) in keywords {
            let index = self.index_of(&name).ok_or_else(|| {
                IntegrationError::<E>::parse(
                    self.routine,
                    format!("got an unexpected keyword argument '{name}'"),
                )
            })?;
            if slots[index].is_some() {
                return Err(IntegrationError::parse(
                    self.routine,
                    format!("got multiple values for argument '{name}'"),
                ));
            }
            slots[index] = Some(value);
        }

        if let Some(missing) = (0..self.required).find(|&i| slots[i].is_none()) {
            return Err(IntegrationError::parse(
                self.routine,
                format!(
                    "missing required argument '{}' (pos {})",
                    self.positional[missing],
                    missing + 1
                ),
            ));
        }

        Ok(BoundArguments {
            schema: self,
            slots,
        })
    }

    fn too_many_positionals(&self, given: usize) -> String {
        let most = self.positional.len();
        let plural = if most == 1 { "" } else { "s" };
        if self.required == most {
            format!("takes {most} positional argument{plural} but {given} were given")
        } else {
            format!(
                "takes from {} to {most} positional arguments but {given} were given",
                self.required
            )
        }
    }
}

/// Input bound to parameter names, not yet converted
#[derive(Debug)]
pub struct BoundArguments<O> {
    schema: &'static RoutineSchema,
    slots: Vec<Option<O>>,
}

impl<O> BoundArguments<O> {
    pub fn schema(&self) -> &'static RoutineSchema {
        self.schema
    }

    /// Value bound to `name`, if any
    pub fn get(&self, name: &str) -> Option<&O> {
        self.schema
            .index_of(name)
            .and_then(|i| self.slots[i].as_ref())
    }

    /// Value bound to a required name
    pub fn required<E>(&self, name: &str) -> Result<&O, IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        self.get(name).ok_or_else(|| {
            IntegrationError::parse(
                self.schema.routine,
                format!("missing required argument '{name}'"),
            )
        })
    }
}
