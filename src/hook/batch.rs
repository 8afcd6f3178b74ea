//! Batch installation from a descriptor source.
//!
//! A descriptor source is a hook-info class, loaded from a *patch* class loader, whose
//! static string-array field lists descriptor units. Each unit is a class in the same
//! loader carrying static `String` fields that name a target method, a static `hook`
//! method and optionally a static `backup` method. Target classes are resolved through a
//! separate *origin* class loader.
//!
//! Descriptors are processed in order with per-descriptor isolation: whatever goes wrong
//! with one unit is logged and recorded in the [`BatchReport`], and processing continues
//! with the next.

use log::{debug, error, info, warn};

use crate::{
    config::ReapplyPolicy,
    hook::{
        BatchReport, DescriptorOutcome, DescriptorState, HookDescriptor, HookInstaller,
        HookRegistry, HookSource, NativeHooker,
    },
    runtime::{ClassLoader, MethodRc, RuntimeTypeRc, Value},
    Error, Result,
};

/// Applies descriptor sources through a [`HookInstaller`]
pub struct DescriptorLoader<'a, N: NativeHooker> {
    installer: &'a HookInstaller<N>,
    registry: &'a HookRegistry,
}

impl<'a, N: NativeHooker> DescriptorLoader<'a, N> {
    /// Create a loader recording applied sources in the process-wide registry
    pub fn new(installer: &'a HookInstaller<N>) -> Self {
        Self::with_registry(installer, HookRegistry::global())
    }

    /// Create a loader recording applied sources in `registry`
    pub fn with_registry(installer: &'a HookInstaller<N>, registry: &'a HookRegistry) -> Self {
        DescriptorLoader {
            installer,
            registry,
        }
    }

    /// Apply every descriptor unit listed by the hook-info class in `patch`, resolving
    /// target classes through `origin`.
    ///
    /// # Errors
    /// Only conditions that prevent reaching any descriptor fail the batch:
    /// [`Error::ClassNotFound`] / [`Error::MissingField`] for the hook-info class and
    /// [`Error::AlreadyApplied`] under [`ReapplyPolicy::Reject`]. Per-descriptor failures
    /// are reported in the returned [`BatchReport`].
    pub fn apply(&self, patch: &ClassLoader, origin: &ClassLoader) -> Result<BatchReport> {
        let config = self.installer.config();
        let info_class = patch.load_class(&config.hook_info_class)?;
        let items = read_string_array(&info_class, &config.item_list_field)?;

        let source = HookSource::new(patch, &info_class.name);
        if self.registry.contains(&source) {
            match config.reapply_policy {
                ReapplyPolicy::Reject => return Err(Error::AlreadyApplied(source.to_string())),
                ReapplyPolicy::Allow => {
                    warn!("Hooks from {source} have already been applied, applying again");
                }
            }
        }

        info!(
            "Applying {} hook items from {} (target loader {})",
            items.len(),
            source,
            origin.name()
        );

        let mut report = BatchReport::default();
        for item in &items {
            info!("Start hooking with item {item}");
            let outcome = match self.apply_item(item, patch, origin) {
                Ok(DescriptorState::Skipped) => DescriptorOutcome::skipped(item),
                Ok(_) => DescriptorOutcome::installed(item),
                Err(e) => {
                    error!("Hook item {item} failed: {e}");
                    DescriptorOutcome::failed(item, e)
                }
            };
            report.outcomes.push(outcome);
        }

        self.registry.record(source);
        info!("Hook batch finished: {report}");
        Ok(report)
    }

    fn apply_item(
        &self,
        item: &str,
        patch: &ClassLoader,
        origin: &ClassLoader,
    ) -> Result<DescriptorState> {
        let config = self.installer.config();
        let unit = patch.load_class(item)?;

        let class_name = read_string(&unit, &config.class_name_field)?;
        let method_name = read_string(&unit, &config.method_name_field)?;
        let method_signature = read_string(&unit, &config.method_signature_field)?;
        if class_name.is_empty() {
            warn!("No target class. Skipping...");
            return Ok(DescriptorState::Skipped);
        }

        let target_class = origin.load_class(&class_name)?;
        if target_class.is_abstract() {
            warn!("Hook may fail for abstract class: {class_name}");
        }

        let hook = find_static(&unit, &config.hook_method)?
            .ok_or_else(|| Error::MissingHook(method_name.clone()))?;
        let backup = find_static(&unit, &config.backup_method)?;

        let descriptor = HookDescriptor {
            item: item.to_string(),
            class_name,
            method_name,
            method_signature,
            hook,
            backup,
        };
        debug!("{}: {}", DescriptorState::Validated, descriptor);

        self.install(&target_class, &descriptor)?;
        Ok(DescriptorState::Installed)
    }

    fn install(&self, target_class: &RuntimeTypeRc, descriptor: &HookDescriptor) -> Result<()> {
        self.installer.find_and_backup_and_hook(
            target_class,
            &descriptor.method_name,
            &descriptor.method_signature,
            &descriptor.hook,
            descriptor.backup.as_ref(),
        )
    }
}

/// Value of a static field, `MissingField` if absent or not static
fn read_static(class: &RuntimeTypeRc, field: &str) -> Result<Value> {
    class
        .field(field)
        .filter(|found| found.is_static())
        .map(|found| found.get())
        .ok_or_else(|| Error::MissingField {
            class: class.name.clone(),
            field: field.to_string(),
        })
}

/// A static `String` field; null reads as the empty string
fn read_string(class: &RuntimeTypeRc, field: &str) -> Result<String> {
    match read_static(class, field)? {
        Value::Null => Ok(String::new()),
        Value::Str(value) => Ok(value.to_string()),
        _ => Err(Error::MissingField {
            class: class.name.clone(),
            field: field.to_string(),
        }),
    }
}

/// A static `String[]` field; null elements are ignored
fn read_string_array(class: &RuntimeTypeRc, field: &str) -> Result<Vec<String>> {
    read_static(class, field)?
        .as_str_array()
        .ok_or_else(|| Error::MissingField {
            class: class.name.clone(),
            field: field.to_string(),
        })
}

/// The static method called `name` declared directly on `class`, if there is exactly one
fn find_static(class: &RuntimeTypeRc, name: &str) -> Result<Option<MethodRc>> {
    let mut candidates: Vec<MethodRc> = class
        .declared_methods_named(name)
        .into_iter()
        .filter(|method| method.is_static())
        .collect();
    if candidates.len() > 1 {
        return Err(Error::AmbiguousMethod {
            class: class.name.clone(),
            name: name.to_string(),
            count: candidates.len(),
        });
    }
    Ok(candidates.pop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::HookConfig,
        hook::InProcessHooker,
        runtime::{ClassBuilder, ClassLoaderRc},
        test::shapes,
    };

    fn hook_info(patch: &ClassLoaderRc, items: &[&str]) {
        let names: Vec<Value> = items.iter().map(|item| Value::from(*item)).collect();
        ClassBuilder::new("com.methodhook.HookInfo")
            .static_field("hookItemNames", "[Ljava/lang/String;", Value::from(names))
            .build(patch)
            .unwrap();
    }

    fn unit(patch: &ClassLoaderRc, name: &str, class_name: Value, hook_return: &str) {
        ClassBuilder::new(name)
            .static_field("className", "Ljava/lang/String;", class_name)
            .static_field("methodName", "Ljava/lang/String;", Value::from("area"))
            .static_field("methodSig", "Ljava/lang/String;", Value::from("()Ljava/lang/Number;"))
            .method(|m| {
                m.name("hook")
                    .descriptor(&format!("(Lcom/example/Shape;){hook_return}"))
                    .static_()
                    .code(|_| Ok(Value::Int(7)))
            })
            .build(patch)
            .unwrap();
    }

    /// A unit targeting `com.example.Shape.<method><signature>` with a static `hook`
    fn shape_unit(patch: &ClassLoaderRc, name: &str, method: &str, signature: &str, hook: &str) {
        ClassBuilder::new(name)
            .static_field("className", "Ljava/lang/String;", Value::from("com.example.Shape"))
            .static_field("methodName", "Ljava/lang/String;", Value::from(method))
            .static_field("methodSig", "Ljava/lang/String;", Value::from(signature))
            .method(|m| {
                m.name("hook")
                    .descriptor(hook)
                    .static_()
                    .code(|_| Ok(Value::Int(9)))
            })
            .build(patch)
            .unwrap();
    }

    #[test]
    fn test_read_fields() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        unit(&patch, "Unit", Value::Null, "Ljava/lang/Integer;");
        let class = patch.load_class("Unit").unwrap();

        assert_eq!(read_string(&class, "className").unwrap(), "");
        assert_eq!(read_string(&class, "methodName").unwrap(), "area");
        assert!(matches!(
            read_string(&class, "missing"),
            Err(Error::MissingField { .. })
        ));
        assert!(matches!(
            read_string_array(&class, "methodName"),
            Err(Error::MissingField { .. })
        ));
        assert!(find_static(&class, "hook").unwrap().is_some());
        assert!(find_static(&class, "backup").unwrap().is_none());
    }

    #[test]
    fn test_isolation_and_skip() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&patch, &["Skip", "Bad", "Good", "Missing"]);
        unit(&patch, "Skip", Value::from(""), "Ljava/lang/Integer;");
        unit(&patch, "Bad", Value::from("com.example.Shape"), "Ljava/lang/Object;");
        unit(&patch, "Good", Value::from("com.example.Shape"), "Ljava/lang/Integer;");

        let installer = HookInstaller::new(InProcessHooker::new());
        let registry = HookRegistry::new();
        let report = DescriptorLoader::with_registry(&installer, &registry)
            .apply(&patch, &fixture.loader)
            .unwrap();

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.outcome("Skip").unwrap().state, DescriptorState::Skipped);
        assert!(matches!(
            report.outcome("Bad").unwrap().error,
            Some(Error::Incompatible(_))
        ));
        assert_eq!(report.outcome("Good").unwrap().state, DescriptorState::Installed);
        assert!(matches!(
            report.outcome("Missing").unwrap().error,
            Some(Error::ClassNotFound(_))
        ));
        assert_eq!(report.installed(), 1);
        assert!(registry.contains(&HookSource::new(&patch, "com.methodhook.HookInfo")));

        let shape = fixture.new_shape(2);
        assert_eq!(
            shape.invoke_virtual("area", "()Ljava/lang/Number;", &[]).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_locator_and_native_failures_are_isolated() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&patch, &["NoSuchMethod", "Native", "Good"]);
        shape_unit(
            &patch,
            "NoSuchMethod",
            "volume",
            "()Ljava/lang/Number;",
            "(Lcom/example/Shape;)Ljava/lang/Integer;",
        );
        shape_unit(&patch, "Native", "perimeter", "()I", "(Lcom/example/Shape;)I");
        unit(&patch, "Good", Value::from("com.example.Shape"), "Ljava/lang/Integer;");

        let installer = HookInstaller::new(InProcessHooker::new());
        let registry = HookRegistry::new();
        let report = DescriptorLoader::with_registry(&installer, &registry)
            .apply(&patch, &fixture.loader)
            .unwrap();

        let missing = report.outcome("NoSuchMethod").unwrap();
        assert_eq!(missing.state, DescriptorState::Failed);
        assert!(matches!(
            &missing.error,
            Some(Error::NotFound { name, .. }) if name == "volume"
        ));

        let native = report.outcome("Native").unwrap();
        assert_eq!(native.state, DescriptorState::Failed);
        assert!(matches!(
            native.error,
            Some(Error::HookInstallationFailed { .. })
        ));

        assert_eq!(report.outcome("Good").unwrap().state, DescriptorState::Installed);
        assert_eq!(report.installed(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            fixture.new_shape(2).invoke_virtual("area", "()Ljava/lang/Number;", &[]).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn test_all_target_fields_read_before_skip() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&patch, &["NoMethodName", "Good"]);
        ClassBuilder::new("NoMethodName")
            .static_field("className", "Ljava/lang/String;", Value::from(""))
            .static_field("methodSig", "Ljava/lang/String;", Value::from("()Ljava/lang/Number;"))
            .build(&patch)
            .unwrap();
        unit(&patch, "Good", Value::from("com.example.Shape"), "Ljava/lang/Integer;");

        let installer = HookInstaller::new(InProcessHooker::new());
        let registry = HookRegistry::new();
        let report = DescriptorLoader::with_registry(&installer, &registry)
            .apply(&patch, &fixture.loader)
            .unwrap();

        let outcome = report.outcome("NoMethodName").unwrap();
        assert_eq!(outcome.state, DescriptorState::Failed);
        assert!(matches!(
            &outcome.error,
            Some(Error::MissingField { field, .. }) if field == "methodName"
        ));
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.installed(), 1);
    }

    #[test]
    fn test_overloaded_hook_is_ambiguous() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&patch, &["Overloaded", "Good"]);
        ClassBuilder::new("Overloaded")
            .static_field("className", "Ljava/lang/String;", Value::from("com.example.Shape"))
            .static_field("methodName", "Ljava/lang/String;", Value::from("area"))
            .static_field("methodSig", "Ljava/lang/String;", Value::from("()Ljava/lang/Number;"))
            .method(|m| {
                m.name("hook")
                    .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                    .static_()
                    .code(|_| Ok(Value::Int(1)))
            })
            .method(|m| {
                m.name("hook")
                    .descriptor("(Lcom/example/Shape;)Ljava/lang/Number;")
                    .static_()
                    .code(|_| Ok(Value::Int(2)))
            })
            .build(&patch)
            .unwrap();
        unit(&patch, "Good", Value::from("com.example.Shape"), "Ljava/lang/Integer;");

        let installer = HookInstaller::new(InProcessHooker::new());
        let registry = HookRegistry::new();
        let report = DescriptorLoader::with_registry(&installer, &registry)
            .apply(&patch, &fixture.loader)
            .unwrap();

        assert!(matches!(
            &report.outcome("Overloaded").unwrap().error,
            Some(Error::AmbiguousMethod { name, count: 2, .. }) if name == "hook"
        ));
        assert_eq!(report.outcome("Good").unwrap().state, DescriptorState::Installed);
        assert_eq!(installer.native().backup_and_hook_calls(), 1);
    }

    #[test]
    fn test_same_named_patch_loaders_are_distinct_sources() {
        let fixture = shapes();
        let registry = HookRegistry::new();
        let installer = HookInstaller::with_config(InProcessHooker::new(), HookConfig::strict());
        let loader = DescriptorLoader::with_registry(&installer, &registry);

        let first = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&first, &["Area"]);
        unit(&first, "Area", Value::from("com.example.Shape"), "Ljava/lang/Integer;");
        let second = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&second, &["Scale"]);
        shape_unit(
            &second,
            "Scale",
            "scale",
            "(Lcom/example/Shape;I)Lcom/example/Shape;",
            "(Lcom/example/Shape;I)Lcom/example/Shape;",
        );

        assert_eq!(loader.apply(&first, &fixture.loader).unwrap().installed(), 1);
        assert_eq!(loader.apply(&second, &fixture.loader).unwrap().installed(), 1);
        assert_eq!(registry.len(), 2);
        assert!(matches!(
            loader.apply(&first, &fixture.loader),
            Err(Error::AlreadyApplied(_))
        ));
    }

    #[test]
    fn test_missing_hook_info() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        let installer = HookInstaller::new(InProcessHooker::new());
        let registry = HookRegistry::new();

        let result = DescriptorLoader::with_registry(&installer, &registry)
            .apply(&patch, &fixture.loader);
        assert!(matches!(result, Err(Error::ClassNotFound(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reapply_policy() {
        let fixture = shapes();
        let patch = ClassLoader::new("patch", fixture.loader.clone());
        hook_info(&patch, &["Good"]);
        unit(&patch, "Good", Value::from("com.example.Shape"), "Ljava/lang/Integer;");
        let registry = HookRegistry::new();

        let allow = HookInstaller::new(InProcessHooker::new());
        let loader = DescriptorLoader::with_registry(&allow, &registry);
        assert_eq!(loader.apply(&patch, &fixture.loader).unwrap().installed(), 1);
        assert_eq!(loader.apply(&patch, &fixture.loader).unwrap().installed(), 1);
        assert_eq!(registry.len(), 1);

        let reject = HookInstaller::with_config(InProcessHooker::new(), HookConfig::strict());
        let result = DescriptorLoader::with_registry(&reject, &registry).apply(&patch, &fixture.loader);
        assert!(matches!(result, Err(Error::AlreadyApplied(_))));
        assert_eq!(reject.native().backup_and_hook_calls(), 0);
    }
}
