mod greeting_test;
mod property_test;
mod semver_test;
