//! A semantic version grammar: `major.minor.patch(-pre)?(+build)?` with dot
//! separated identifier runs in the prerelease and build parts.

use crate::grammar::{CompiledGrammar, GrammarBuilder};
use crate::rule::RuleExpr;
use crate::util::Code;
use crate::{hydrate, CaptureValue, IBuilder, ParseError, ParseSession};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<String>,
    pub build: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum SemVerValue {
    Number(u64),
    Id(String),
    Ids(Vec<String>),
    Version(SemVer),
}

pub fn semver_grammar() -> CompiledGrammar {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Num",
            RuleExpr::plus(RuleExpr::chars("0-9")),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Id",
            RuleExpr::plus(RuleExpr::chars("a-zA-Z0-9-")),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Prerelease",
            RuleExpr::sequence(vec![
                RuleExpr::lit("-"),
                RuleExpr::separated(RuleExpr::reference("Id"), RuleExpr::lit("."), 1, None)
                    .capture("ids"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Build",
            RuleExpr::sequence(vec![
                RuleExpr::lit("+"),
                RuleExpr::separated(RuleExpr::reference("Id"), RuleExpr::lit("."), 1, None)
                    .capture("ids"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "SemVer",
            RuleExpr::sequence(vec![
                RuleExpr::reference("Num").capture("major"),
                RuleExpr::lit("."),
                RuleExpr::reference("Num").capture("minor"),
                RuleExpr::lit("."),
                RuleExpr::reference("Num").capture("patch"),
                RuleExpr::optional(RuleExpr::reference("Prerelease")).capture("prerelease"),
                RuleExpr::optional(RuleExpr::reference("Build")).capture("build"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder.compile("SemVer").unwrap()
}

pub struct SemVerBuilder;

impl IBuilder for SemVerBuilder {
    type Value = SemVerValue;

    fn build(
        &self,
        rule: &str,
        _span: (usize, usize),
        text: &str,
        captures: Vec<(Rc<str>, CaptureValue<SemVerValue>)>,
        _children: Vec<SemVerValue>,
    ) -> SemVerValue {
        match rule {
            "Num" => SemVerValue::Number(text.parse().expect("digit run")),
            "Id" => SemVerValue::Id(text.to_string()),
            "Prerelease" | "Build" => {
                let ids = captures
                    .into_iter()
                    .find(|(name, _)| name.as_ref() == "ids")
                    .map(|(_, value)| value.into_items())
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|item| match item {
                        CaptureValue::One(SemVerValue::Id(id)) => Some(id),
                        _ => None,
                    })
                    .collect();
                SemVerValue::Ids(ids)
            }
            "SemVer" => {
                let mut version = SemVer::default();
                for (name, value) in captures {
                    match (name.as_ref(), value) {
                        ("major", CaptureValue::One(SemVerValue::Number(n))) => version.major = n,
                        ("minor", CaptureValue::One(SemVerValue::Number(n))) => version.minor = n,
                        ("patch", CaptureValue::One(SemVerValue::Number(n))) => version.patch = n,
                        ("prerelease", CaptureValue::One(SemVerValue::Ids(ids))) => {
                            version.prerelease = ids
                        }
                        ("build", CaptureValue::One(SemVerValue::Ids(ids))) => version.build = ids,
                        _ => {}
                    }
                }
                SemVerValue::Version(version)
            }
            _ => SemVerValue::Id(text.to_string()),
        }
    }
}

/// Parse a semantic version string.
pub fn parse_semver(input: &str) -> Result<SemVer, ParseError> {
    let grammar = semver_grammar();
    let session = ParseSession::new(&grammar);
    let tree = session.parse(input).into_result()?;
    let code = Code::from(input);
    match hydrate(&grammar, &tree, &code, &SemVerBuilder) {
        SemVerValue::Version(version) => Ok(version),
        other => panic!("Unexpected hydration result: {:?}", other),
    }
}
