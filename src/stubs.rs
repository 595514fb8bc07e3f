//! Built-in templates, compiled into the binary.
//!
//! Projects may publish their own copy of any stub under the configured
//! stubs directory; see [`Filesystem::stub`](crate::filesystem::Filesystem::stub).

const STUBS: &[(&str, &str)] = &[
    ("controller.class.stub", include_str!("../stubs/controller.class.stub")),
    ("draft.stub", include_str!("../stubs/draft.stub")),
    ("event.stub", include_str!("../stubs/event.stub")),
    ("factory.stub", include_str!("../stubs/factory.stub")),
    ("job.stub", include_str!("../stubs/job.stub")),
    ("livewire.stub", include_str!("../stubs/livewire.stub")),
    ("mail.stub", include_str!("../stubs/mail.stub")),
    ("mail.view.stub", include_str!("../stubs/mail.view.stub")),
    ("migration.stub", include_str!("../stubs/migration.stub")),
    ("model.class.stub", include_str!("../stubs/model.class.stub")),
    ("notification.stub", include_str!("../stubs/notification.stub")),
    ("policy.class.stub", include_str!("../stubs/policy.class.stub")),
    ("request.stub", include_str!("../stubs/request.stub")),
    ("resource.collection.stub", include_str!("../stubs/resource.collection.stub")),
    ("resource.stub", include_str!("../stubs/resource.stub")),
    ("seeder.stub", include_str!("../stubs/seeder.stub")),
    ("test.class.stub", include_str!("../stubs/test.class.stub")),
    ("view.stub", include_str!("../stubs/view.stub")),
];

/// Built-in template text for a stub name
pub fn builtin(name: &str) -> Option<&'static str> {
    STUBS
        .iter()
        .find(|(stub, _)| *stub == name)
        .map(|(_, contents)| *contents)
}

/// Names of every built-in stub
pub fn names() -> impl Iterator<Item = &'static str> {
    STUBS.iter().map(|(name, _)| *name)
}
