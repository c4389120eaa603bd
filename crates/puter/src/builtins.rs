//! Built-in function registry
//!
//! The registry is fixed: it is built once on first use and shared by every
//! evaluation. Each entry declares its accepted argument count, which the
//! call evaluator checks before any argument is evaluated.

use std::sync::OnceLock;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::accessors::discriminator;
use crate::error::{type_name, EvalError, Result};
use crate::methods;
use crate::value::Value;
use crate::{Environment, EvalContext};

/// Pure function of its arguments.
pub type NativeFn = fn(&[Value]) -> Result<Value>;

/// Function that needs the evaluation state (RNG, workflow prompt, accessors).
pub type HostFn = fn(&mut Environment, &EvalContext, &[Value]) -> Result<Value>;

/// How a builtin is implemented.
#[derive(Clone, Copy)]
pub enum Call {
    /// Pure function
    Native(NativeFn),
    /// Needs the environment and context
    Host(HostFn),
}

/// A named builtin with its accepted argument range.
#[derive(Clone, Copy)]
pub struct Function {
    /// Name as called from programs
    pub name: &'static str,

    /// Implementation
    pub call: Call,

    /// Minimum and maximum argument count (`None` = unbounded)
    pub args: (usize, Option<usize>),
}

impl Function {
    const fn native(name: &'static str, f: NativeFn, min: usize, max: Option<usize>) -> Self {
        Self {
            name,
            call: Call::Native(f),
            args: (min, max),
        }
    }

    const fn host(name: &'static str, f: HostFn, min: usize, max: Option<usize>) -> Self {
        Self {
            name,
            call: Call::Host(f),
            args: (min, max),
        }
    }

    /// Validate an argument count.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` (SyntaxKind) naming the function and the
    /// accepted count.
    pub fn check_arity(&self, got: usize) -> Result<()> {
        let (min, max) = self.args;
        if got < min || max.is_some_and(|max| got > max) {
            return Err(EvalError::ArityMismatch {
                name: self.name.to_string(),
                min,
                max,
                got,
            });
        }
        Ok(())
    }

    /// Invoke with already-evaluated arguments.
    pub fn invoke(&self, env: &mut Environment, ctx: &EvalContext, args: &[Value]) -> Result<Value> {
        match self.call {
            Call::Native(f) => f(args),
            Call::Host(f) => f(env, ctx, args),
        }
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

static GLOBAL_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Registry of builtin functions by name.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<&'static str, Function>,
}

impl FunctionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function.
    pub fn register(&mut self, function: Function) {
        self.functions.insert(function.name, function);
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    /// Get the number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// The registry with every builtin installed.
pub fn global_registry() -> &'static FunctionRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let mut registry = FunctionRegistry::new();
        register_builtins(&mut registry);
        registry
    })
}

fn register_builtins(registry: &mut FunctionRegistry) {
    // Math
    registry.register(Function::native("round", round, 1, Some(2)));
    registry.register(Function::native("ceil", ceil, 1, Some(1)));
    registry.register(Function::native("floor", floor, 1, Some(1)));
    registry.register(Function::native("sqrt", sqrt, 1, Some(1)));
    registry.register(Function::native("min", min, 2, None));
    registry.register(Function::native("max", max, 2, None));
    registry.register(Function::host("random_int", random_int, 2, Some(2)));
    registry.register(Function::host("random_choice", random_choice, 2, None));

    // Casts
    registry.register(Function::native("int", |a| to_int(&a[0]), 1, Some(1)));
    registry.register(Function::native("float", |a| to_float(&a[0]), 1, Some(1)));
    registry.register(Function::native("str", |a| Ok(to_str(&a[0])), 1, Some(1)));
    registry.register(Function::native(
        "bool",
        |a| Ok(Value::Bool(a[0].is_truthy())),
        1,
        Some(1),
    ));

    // Workflow
    registry.register(Function::host("node", node, 1, Some(1)));
    registry.register(Function::host("nodes", nodes, 0, Some(1)));

    // Introspection
    registry.register(Function::host("dir", dir, 1, Some(1)));
    registry.register(Function::native("type", type_of, 1, Some(1)));
}

// ═══════════════════════════════════════════════════════════════════════
// Casts (shared with output coercion)
// ═══════════════════════════════════════════════════════════════════════

/// `int(value)`
pub fn to_int(value: &Value) -> Result<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::Float(f) => float_to_int("int", f.trunc()).map(Value::Int),
        Value::Str(s) => {
            let text = s.trim().replace('_', "");
            text.parse::<i64>().map(Value::Int).map_err(|_| {
                EvalError::builtin(
                    "int",
                    format!("invalid literal for int() with base 10: {}", value.repr()),
                )
            })
        }
        other => Err(EvalError::builtin(
            "int",
            format!(
                "argument must be a string or a number, not '{}'",
                type_name(other)
            ),
        )),
    }
}

/// `float(value)`
pub fn to_float(value: &Value) -> Result<Value> {
    match value {
        Value::Str(s) => {
            let text = s.trim().replace('_', "");
            text.parse::<f64>().map(Value::Float).map_err(|_| {
                EvalError::builtin(
                    "float",
                    format!("could not convert string to float: {}", value.repr()),
                )
            })
        }
        other => other.as_f64().map(Value::Float).ok_or_else(|| {
            EvalError::builtin(
                "float",
                format!(
                    "argument must be a string or a number, not '{}'",
                    type_name(other)
                ),
            )
        }),
    }
}

/// `str(value)`
pub fn to_str(value: &Value) -> Value {
    match value {
        Value::Str(_) => value.clone(),
        other => Value::string(other.to_string()),
    }
}

fn float_to_int(name: &str, f: f64) -> Result<i64> {
    if f.is_nan() {
        return Err(EvalError::builtin(name, "cannot convert float NaN to integer"));
    }
    if f.is_infinite() {
        return Err(EvalError::builtin(
            name,
            "cannot convert float infinity to integer",
        ));
    }
    if !(-9.223_372_036_854_776e18..9.223_372_036_854_776e18).contains(&f) {
        return Err(EvalError::IntegerOverflow);
    }
    Ok(f as i64)
}

fn number(name: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        EvalError::builtin(
            name,
            format!("must be a real number, not '{}'", type_name(value)),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Math
// ═══════════════════════════════════════════════════════════════════════

/// Beyond this many digits every finite f64 is already exact.
const MAX_FLOAT_DIGITS: i64 = 330;

/// Half-to-even rounding; an int result without `ndigits`.
fn round(args: &[Value]) -> Result<Value> {
    let digits = match args.get(1) {
        None | Some(Value::None) => None,
        Some(d) => Some(d.as_int().ok_or_else(|| {
            EvalError::builtin(
                "round",
                format!("'{}' object cannot be interpreted as an integer", type_name(d)),
            )
        })?),
    };

    match (&args[0], digits) {
        (Value::Int(n), None) => Ok(Value::Int(*n)),
        (Value::Bool(b), None) => Ok(Value::Int(*b as i64)),
        (Value::Int(n), Some(d)) if d >= 0 => Ok(Value::Int(*n)),
        (Value::Int(n), Some(d)) => {
            let scale = 10f64.powi(d.saturating_neg().min(308) as i32);
            float_to_int("round", (*n as f64 / scale).round_ties_even() * scale).map(Value::Int)
        }
        (value, None) => float_to_int("round", number("round", value)?.round_ties_even()).map(Value::Int),
        (value, Some(d)) => {
            let f = number("round", value)?;
            if !f.is_finite() || d > MAX_FLOAT_DIGITS {
                return Ok(Value::Float(f));
            }
            if d >= 0 {
                // Decimal formatting rounds the exact binary value
                let text = format!("{:.*}", d as usize, f);
                return Ok(Value::Float(text.parse().unwrap_or(f)));
            }
            let scale = 10f64.powi(d.max(-308) as i32);
            let rounded = (f * scale).round_ties_even() / scale;
            Ok(Value::Float(if rounded.is_finite() { rounded } else { f }))
        }
    }
}

fn ceil(args: &[Value]) -> Result<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        value => float_to_int("ceil", number("ceil", value)?.ceil()).map(Value::Int),
    }
}

fn floor(args: &[Value]) -> Result<Value> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        value => float_to_int("floor", number("floor", value)?.floor()).map(Value::Int),
    }
}

fn sqrt(args: &[Value]) -> Result<Value> {
    let f = number("sqrt", &args[0])?;
    if f < 0.0 {
        return Err(EvalError::builtin("sqrt", "math domain error"));
    }
    Ok(Value::Float(f.sqrt()))
}

fn extreme(args: &[Value], op: &str, replace: std::cmp::Ordering) -> Result<Value> {
    let mut best = &args[0];
    for candidate in &args[1..] {
        match candidate.compare(best) {
            Some(ordering) if ordering == replace => best = candidate,
            Some(_) => {}
            None => return Err(EvalError::operands(op, candidate, best)),
        }
    }
    Ok(best.clone())
}

fn min(args: &[Value]) -> Result<Value> {
    extreme(args, "<", std::cmp::Ordering::Less)
}

fn max(args: &[Value]) -> Result<Value> {
    extreme(args, ">", std::cmp::Ordering::Greater)
}

fn random_int(env: &mut Environment, _ctx: &EvalContext, args: &[Value]) -> Result<Value> {
    let bound = |v: &Value| {
        v.as_int().ok_or_else(|| {
            EvalError::builtin(
                "random_int",
                format!("'{}' object cannot be interpreted as an integer", type_name(v)),
            )
        })
    };
    let (low, high) = (bound(&args[0])?, bound(&args[1])?);
    if low > high {
        return Err(EvalError::builtin(
            "random_int",
            format!("empty range ({}, {})", low, high),
        ));
    }
    Ok(Value::Int(env.rng().gen_range(low..=high)))
}

fn random_choice(env: &mut Environment, _ctx: &EvalContext, args: &[Value]) -> Result<Value> {
    args.choose(env.rng())
        .cloned()
        .ok_or_else(|| EvalError::builtin("random_choice", "cannot choose from an empty sequence"))
}

// ═══════════════════════════════════════════════════════════════════════
// Workflow
// ═══════════════════════════════════════════════════════════════════════

fn node(_env: &mut Environment, ctx: &EvalContext, args: &[Value]) -> Result<Value> {
    Ok(ctx.prompt.find_node(&args[0]).cloned().unwrap_or(Value::None))
}

fn nodes(_env: &mut Environment, ctx: &EvalContext, args: &[Value]) -> Result<Value> {
    Ok(Value::list(ctx.prompt.find_nodes(args.first())))
}

// ═══════════════════════════════════════════════════════════════════════
// Introspection
// ═══════════════════════════════════════════════════════════════════════

/// Sorted attribute names: mapping keys, methods and special accessors.
fn dir(_env: &mut Environment, ctx: &EvalContext, args: &[Value]) -> Result<Value> {
    let value = &args[0];
    let mut names: Vec<String> = methods::names(value).map(str::to_string).collect();
    if let Some(map) = value.as_map() {
        names.extend(map.keys().cloned());
    }
    if let Some(kind) = discriminator(value) {
        names.extend(ctx.accessors.accessors_for(kind));
    }
    names.sort();
    names.dedup();
    Ok(Value::list(names.into_iter().map(Value::string).collect()))
}

fn type_of(args: &[Value]) -> Result<Value> {
    Ok(Value::string(format!("<class '{}'>", type_name(&args[0]))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: &[Value]) -> Result<Value> {
        let mut env = Environment::with_seed(1);
        let ctx = EvalContext::default();
        let function = global_registry().get(name).unwrap();
        function.check_arity(args.len())?;
        function.invoke(&mut env, &ctx, args)
    }

    #[test]
    fn test_registry_contents() {
        let registry = global_registry();
        for name in [
            "round", "ceil", "floor", "sqrt", "min", "max", "random_int", "random_choice", "int",
            "float", "str", "bool", "node", "nodes", "dir", "type",
        ] {
            assert!(registry.get(name).is_some(), "missing {}", name);
        }
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(call("round", &[Value::Float(2.5)]).unwrap(), Value::Int(2));
        assert_eq!(call("round", &[Value::Float(3.5)]).unwrap(), Value::Int(4));
        assert_eq!(
            call("round", &[Value::Float(1.2345), Value::Int(2)]).unwrap(),
            Value::Float(1.23)
        );
        assert_eq!(
            call("round", &[Value::Int(1250), Value::Int(-2)]).unwrap(),
            Value::Int(1200)
        );
    }

    #[test]
    fn test_round_extreme_digits() {
        assert_eq!(
            call("round", &[Value::Int(5), Value::Int(i64::MIN)]).unwrap(),
            Value::Int(0)
        );
        assert_eq!(
            call("round", &[Value::Float(1.5), Value::Int(i64::MAX)]).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            call("round", &[Value::Float(1.5), Value::Int(i64::MIN)]).unwrap(),
            Value::Float(0.0)
        );
    }

    #[test]
    fn test_round_uses_exact_binary_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(
            call("round", &[Value::Float(2.675), Value::Int(2)]).unwrap(),
            Value::Float(2.67)
        );
        assert_eq!(
            call("round", &[Value::Float(-0.125), Value::Int(1)]).unwrap(),
            Value::Float(-0.1)
        );
        assert_eq!(
            call("round", &[Value::Float(1234.5678), Value::Int(-2)]).unwrap(),
            Value::Float(1200.0)
        );
    }

    #[test]
    fn test_ceil_floor_sqrt() {
        assert_eq!(call("ceil", &[Value::Float(1.2)]).unwrap(), Value::Int(2));
        assert_eq!(call("floor", &[Value::Float(-1.2)]).unwrap(), Value::Int(-2));
        assert_eq!(call("sqrt", &[Value::Int(9)]).unwrap(), Value::Float(3.0));
        assert!(call("sqrt", &[Value::Int(-1)]).is_err());
    }

    #[test]
    fn test_min_max() {
        let args = [Value::Int(3), Value::Float(1.5), Value::Int(2)];
        assert_eq!(call("min", &args).unwrap(), Value::Float(1.5));
        assert_eq!(call("max", &args).unwrap(), Value::Int(3));
        assert!(call("min", &[Value::Int(1), Value::string("a")]).is_err());
    }

    #[test]
    fn test_arity_messages() {
        let err = call("min", &[Value::Int(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid function call: min requires 2 or more args"
        );
        let err = call("round", &[Value::Int(1), Value::Int(1), Value::Int(1)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid function call: round requires 1 to 2 args");
    }

    #[test]
    fn test_casts() {
        assert_eq!(to_int(&Value::Float(3.9)).unwrap(), Value::Int(3));
        assert_eq!(to_int(&Value::string(" 42 ")).unwrap(), Value::Int(42));
        assert!(to_int(&Value::string("3.0")).is_err());
        assert_eq!(to_float(&Value::string("1e3")).unwrap(), Value::Float(1000.0));
        assert_eq!(to_str(&Value::Float(2.0)), Value::string("2.0"));
        assert_eq!(
            call("bool", &[Value::list(vec![])]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_random_within_bounds() {
        for _ in 0..20 {
            let n = call("random_int", &[Value::Int(1), Value::Int(3)])
                .unwrap()
                .as_int()
                .unwrap();
            assert!((1..=3).contains(&n));
        }
        let picked = call("random_choice", &[Value::string("a"), Value::string("b")]).unwrap();
        assert!(picked == Value::string("a") || picked == Value::string("b"));
    }

    #[test]
    fn test_type_and_dir() {
        assert_eq!(
            call("type", &[Value::Int(1)]).unwrap(),
            Value::string("<class 'int'>")
        );
        let names = call("dir", &[Value::string("x")]).unwrap();
        assert!(names.contains(&Value::string("lower")).unwrap());
    }
}
