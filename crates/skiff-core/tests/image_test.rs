use skiff_core::ImageRef;

#[test]
fn renders_fully_qualified_reference() {
    let r = ImageRef::new(
        "us-central1",
        "proj-1",
        "repo-a",
        "svc-img",
        "travel-agency",
        "abc123",
    )
    .unwrap();

    assert_eq!(
        r.to_string(),
        "us-central1-docker.pkg.dev/proj-1/repo-a/svc-img/travel-agency:abc123"
    );
}

#[test]
fn registry_host_and_repository_path() {
    let r = ImageRef::new("europe-west1", "p", "r", "i", "s", "deadbeef").unwrap();

    assert_eq!(r.registry_host(), "europe-west1-docker.pkg.dev");
    assert_eq!(
        r.repository_path(),
        "europe-west1-docker.pkg.dev/p/r/i/s"
    );
}

#[test]
fn rejects_empty_components() {
    for field in 0..6 {
        let parts = ["us", "p", "r", "i", "s", "t"].map(String::from);
        let mut parts = parts;
        parts[field] = String::new();
        let [location, project, repo, image, service, tag] = parts;
        let result = ImageRef::new(location, project, repo, image, service, tag);
        assert!(result.is_err(), "empty field #{field} accepted");
    }
}

#[test]
fn rejects_uppercase_path_components() {
    let result = ImageRef::new("us", "Proj", "r", "i", "s", "abc");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("project"), "got: {err}");
}

#[test]
fn rejects_slash_in_component() {
    assert!(ImageRef::new("us", "p", "r/evil", "i", "s", "abc").is_err());
}

#[test]
fn tag_allows_mixed_case() {
    // Tags are less restrictive than repository path segments
    assert!(ImageRef::new("us", "p", "r", "i", "s", "ABCdef123").is_ok());
}

#[test]
fn tag_rejects_leading_dot_or_dash() {
    assert!(ImageRef::new("us", "p", "r", "i", "s", ".hidden").is_err());
    assert!(ImageRef::new("us", "p", "r", "i", "s", "-flag").is_err());
}

#[test]
fn tag_rejects_colon() {
    assert!(ImageRef::new("us", "p", "r", "i", "s", "v1:2").is_err());
}

#[test]
fn tag_rejects_over_128_chars() {
    let long = "a".repeat(129);
    assert!(ImageRef::new("us", "p", "r", "i", "s", long).is_err());
    let ok = "a".repeat(128);
    assert!(ImageRef::new("us", "p", "r", "i", "s", ok).is_ok());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn component() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9._-]{0,15}"
    }

    fn tag() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_][A-Za-z0-9._-]{0,20}"
    }

    proptest! {
        #[test]
        fn valid_inputs_always_accepted(
            location in component(),
            project in component(),
            repo in component(),
            image in component(),
            service in component(),
            tag in tag(),
        ) {
            let r = ImageRef::new(&location, &project, &repo, &image, &service, &tag).unwrap();
            let rendered = r.to_string();
            let expected_prefix = format!("{location}-docker.pkg.dev/");
            let expected_suffix = format!(":{tag}");
            prop_assert!(rendered.starts_with(&expected_prefix));
            prop_assert!(rendered.ends_with(&expected_suffix));
        }

        #[test]
        fn rendering_is_deterministic(
            project in component(),
            tag in tag(),
        ) {
            let a = ImageRef::new("us", &project, "r", "i", "s", &tag).unwrap();
            let b = ImageRef::new("us", &project, "r", "i", "s", &tag).unwrap();
            prop_assert_eq!(a.to_string(), b.to_string());
        }
    }
}
