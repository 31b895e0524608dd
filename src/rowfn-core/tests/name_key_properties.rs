use proptest::prelude::*;
use rowfn_core::{drop_suffix, NameKey};

fn base_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,12}".prop_filter("no delimiter inside the base", |s| !s.contains("__"))
}

proptest! {
    #[test]
    fn key_is_idempotent(name in "[A-Za-z_][A-Za-z0-9_]{0,20}") {
        prop_assume!(!name.starts_with("__"));
        let key = NameKey::new(&name).unwrap();
        prop_assert_eq!(NameKey::new(key.as_str()).unwrap(), key);
    }

    #[test]
    fn suffix_does_not_change_key(base in base_name(), suffix in "[A-Za-z0-9_]{0,10}") {
        prop_assume!(!base.ends_with('_'));
        let mangled = format!("{base}__{suffix}");
        prop_assert_eq!(drop_suffix(&mangled).unwrap(), base.as_str());
        prop_assert_eq!(NameKey::new(&mangled).unwrap(), NameKey::new(&base).unwrap());
    }

    #[test]
    fn case_does_not_change_key(base in base_name()) {
        let upper = NameKey::new(&base.to_uppercase()).unwrap();
        let lower = NameKey::new(&base.to_lowercase()).unwrap();
        prop_assert_eq!(&upper, &lower);
        prop_assert_eq!(NameKey::new(&base).unwrap(), lower);
    }

    #[test]
    fn leading_delimiter_always_fails(rest in "[A-Za-z0-9_]{0,10}") {
        let name = format!("__{rest}");
        prop_assert!(NameKey::new(&name).is_err());
    }
}
