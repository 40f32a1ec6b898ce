use crate::examples::semver::parse_semver;

#[test]
pub fn full_version_with_prerelease_and_build() {
    let version = parse_semver("1.2.3-alpha+3.14").unwrap();
    assert_eq!(version.major, 1);
    assert_eq!(version.minor, 2);
    assert_eq!(version.patch, 3);
    assert_eq!(version.prerelease, vec!["alpha".to_string()]);
    assert_eq!(version.build, vec!["3".to_string(), "14".to_string()]);
}

#[test]
pub fn bare_version() {
    let version = parse_semver("0.0.0").unwrap();
    assert_eq!((version.major, version.minor, version.patch), (0, 0, 0));
    assert!(version.prerelease.is_empty());
    assert!(version.build.is_empty());
}

#[test]
pub fn prerelease_only() {
    let version = parse_semver("1.0.0-rc.1").unwrap();
    assert_eq!(version.prerelease, vec!["rc".to_string(), "1".to_string()]);
    assert!(version.build.is_empty());
}

#[test]
pub fn build_only() {
    let version = parse_semver("1.0.0+exp.sha.5114f85").unwrap();
    assert!(version.prerelease.is_empty());
    assert_eq!(
        version.build,
        vec!["exp".to_string(), "sha".to_string(), "5114f85".to_string()]
    );
}

#[test]
pub fn identifiers_may_contain_dashes() {
    let version = parse_semver("2.1.0-x-y-z.0").unwrap();
    assert_eq!(version.prerelease, vec!["x-y-z".to_string(), "0".to_string()]);
}

#[test]
pub fn malformed_versions_fail() {
    assert!(parse_semver("1.2").is_err());
    assert!(parse_semver("1.2.x").is_err());
    assert!(parse_semver("1.2.3-").is_err());
    assert!(parse_semver("1.2.3+").is_err());
    assert!(parse_semver("1.2.3-alpha.").is_err());
}
