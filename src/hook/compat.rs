//! Calling-compatibility check between two methods.
//!
//! A replacement can stand in for an original method when every call site of the original
//! can be forwarded to it unchanged:
//!
//! 1. Both methods are compared by their *effective* parameter lists: an instance method
//!    receives its declaring class as an implicit leading parameter.
//! 2. The original's return type must be assignable from the replacement's (covariant
//!    returns are fine, widened returns are not).
//! 3. The effective parameter counts must be equal.
//! 4. At every index, the replacement's parameter type must be assignable from the
//!    original's (parameters are contravariant).
//!
//! The first violated rule is reported as an [`Incompatibility`].
//!
//! # Examples
//!
//! ```rust,ignore
//! // Shape.area()Ljava/lang/Number;  vs  static fakeArea(Lcom/example/Shape;)Ljava/lang/Integer;
//! check_compatible_methods(&area, &fake_area, MethodRole::Original, MethodRole::Hook)?;
//! ```

use log::debug;

use crate::{
    runtime::{typesystem::is_assignable_from, MethodRc, RuntimeTypeRc},
    Error, Incompatibility, MethodRole, Result,
};

/// The parameter types a caller actually passes: the receiver (for instance methods)
/// followed by the declared parameters.
///
/// # Errors
/// Returns [`Error::TypeError`] if the declaring class of an instance method is no longer
/// alive
pub fn effective_params(method: &MethodRc) -> Result<Vec<RuntimeTypeRc>> {
    if method.is_static() {
        return Ok(method.params.clone());
    }

    let receiver = method.declaring_class().ok_or_else(|| {
        Error::TypeError(format!(
            "Declaring class of {} has been unloaded",
            method.fullname()
        ))
    })?;

    let mut params = Vec::with_capacity(method.params.len() + 1);
    params.push(receiver);
    params.extend(method.params.iter().cloned());
    Ok(params)
}

/// Verify that `replacement` can be called wherever `original` is called.
///
/// The roles only label the methods in diagnostics.
///
/// # Errors
/// Returns [`Error::Incompatible`] naming the first mismatch found
pub fn check_compatible_methods(
    original: &MethodRc,
    replacement: &MethodRc,
    original_role: MethodRole,
    replacement_role: MethodRole,
) -> Result<()> {
    debug!(
        "Checking {} {} against {} {}",
        original_role, original, replacement_role, replacement
    );

    if !is_assignable_from(&original.return_type, &replacement.return_type) {
        return Err(Incompatibility::ReturnType {
            original_role,
            original: original.return_type.to_string(),
            replacement_role,
            replacement: replacement.return_type.to_string(),
        }
        .into());
    }

    let original_params = effective_params(original)?;
    let replacement_params = effective_params(replacement)?;

    if original_params.len() != replacement_params.len() {
        return Err(Incompatibility::Arity {
            original_role,
            original: original_params.len(),
            replacement_role,
            replacement: replacement_params.len(),
        }
        .into());
    }

    for (index, (from, to)) in original_params
        .iter()
        .zip(replacement_params.iter())
        .enumerate()
    {
        if !is_assignable_from(to, from) {
            return Err(Incompatibility::Parameter {
                index,
                original_role,
                original: from.to_string(),
                replacement_role,
                replacement: to.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::shapes;

    const FAKE_AREA: &str = "(Lcom/example/Shape;)Ljava/lang/Integer;";

    #[test]
    fn test_static_hook_for_instance_target() {
        let fixture = shapes();
        let area = fixture.area();
        let fake = fixture.hook_method("fakeArea", FAKE_AREA);

        let params = effective_params(&area).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "com.example.Shape");

        check_compatible_methods(&area, &fake, MethodRole::Original, MethodRole::Hook).unwrap();
    }

    #[test]
    fn test_arity_mismatch() {
        let fixture = shapes();
        let area = fixture.area();
        let fake = fixture.hook_method("fakeArea", "(Lcom/example/Shape;I)Ljava/lang/Integer;");

        let error =
            check_compatible_methods(&area, &fake, MethodRole::Original, MethodRole::Hook)
                .unwrap_err();
        assert!(matches!(
            error,
            Error::Incompatible(Incompatibility::Arity {
                original: 1,
                replacement: 2,
                ..
            })
        ));
        assert_eq!(
            error.to_string(),
            "Number of arguments don't match. Original: 1, Hook: 2"
        );
    }

    #[test]
    fn test_widened_return() {
        let fixture = shapes();
        let area = fixture.area();
        let widened = fixture.hook_method("widenedArea", "(Lcom/example/Shape;)Ljava/lang/Object;");

        let error =
            check_compatible_methods(&area, &widened, MethodRole::Original, MethodRole::Hook)
                .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Incompatible return types. Original: class java.lang.Number, Hook: class java.lang.Object"
        );
    }

    #[test]
    fn test_narrowed_parameter() {
        let fixture = shapes();
        let area = fixture.area();
        let narrow = fixture.hook_method("squareArea", "(Lcom/example/Square;)Ljava/lang/Integer;");

        let error =
            check_compatible_methods(&area, &narrow, MethodRole::Original, MethodRole::Hook)
                .unwrap_err();
        assert!(matches!(
            error,
            Error::Incompatible(Incompatibility::Parameter { index: 0, .. })
        ));
        assert_eq!(
            error.to_string(),
            "Incompatible argument #0: Original: class com.example.Shape, Hook: class com.example.Square"
        );
    }

    #[test]
    fn test_widened_parameter_accepted() {
        let fixture = shapes();
        let area = fixture.area();
        let wide = fixture.hook_method("anyArea", "(Ljava/lang/Object;)Ljava/lang/Integer;");

        check_compatible_methods(&area, &wide, MethodRole::Original, MethodRole::Hook).unwrap();
    }

    #[test]
    fn test_backup_direction() {
        let fixture = shapes();
        let area = fixture.area();
        let orig = fixture.hook_method("origArea", "(Lcom/example/Shape;)Ljava/lang/Number;");
        check_compatible_methods(&orig, &area, MethodRole::Backup, MethodRole::Original).unwrap();

        // A backup declaring a narrower return than the target cannot hold its result
        let narrow = fixture.hook_method("fakeArea", FAKE_AREA);
        let error =
            check_compatible_methods(&narrow, &area, MethodRole::Backup, MethodRole::Original)
                .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Incompatible return types. Backup: class java.lang.Integer, Original: class java.lang.Number"
        );
    }

    #[test]
    fn test_primitive_parameters() {
        let fixture = shapes();
        let scale = fixture
            .shape
            .declared_method("scale", "(Lcom/example/Shape;I)Lcom/example/Shape;")
            .unwrap();
        let long_scale = fixture.hook_method("scaleLong", "(Lcom/example/Shape;J)Lcom/example/Shape;");

        let error =
            check_compatible_methods(&scale, &long_scale, MethodRole::Original, MethodRole::Hook)
                .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Incompatible argument #1: Original: int, Hook: long"
        );
    }
}
