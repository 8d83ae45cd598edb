use assert_matches::assert_matches;
use camino::Utf8Path;

use kira_prep::domain::{
    MISSING_REGISTRY_ID, Pipeline, ProjectName, RunId, parse_run_id, strip_registry_id,
};
use kira_prep::error::PrepError;

#[test]
fn parse_run_id_returns_date_and_instrument_code() {
    let (date, code) = parse_run_id("191103_D32611_0365_G00DHB5YXX").unwrap();
    assert_eq!(date, "2019-11-03");
    assert_eq!(code, "D32611_0365_G00DHB5YXX");

    let (date, code) = parse_run_id("161004_D00611_0365_AH2HJ5BCXY").unwrap();
    assert_eq!(date, "2016-10-04");
    assert_eq!(code, "D00611_0365_AH2HJ5BCXY");

    let (date, code) = parse_run_id("160909_K00180_0244_BH7VNKBBXX").unwrap();
    assert_eq!(date, "2016-09-09");
    assert_eq!(code, "K00180_0244_BH7VNKBBXX");
}

#[test]
fn parse_run_id_requires_underscore() {
    let err = parse_run_id("foo").unwrap_err();
    assert_matches!(err, PrepError::InvalidRunId(_));
}

#[test]
fn parse_run_id_requires_numeric_date() {
    let err = parse_run_id("19II03_D32611_0365").unwrap_err();
    assert_matches!(err, PrepError::InvalidRunId(_));

    let err = parse_run_id("20191103_D32611_0365").unwrap_err();
    assert_matches!(err, PrepError::InvalidRunId(_));

    let err = parse_run_id("190230_D32611_0365").unwrap_err();
    assert_matches!(err, PrepError::InvalidRunId(_));
}

#[test]
fn run_id_from_path_uses_final_segment() {
    let run_id = RunId::from_run_path(Utf8Path::new("/seq/runs/191103_D32611_0365_G00DHB5YXX/")).unwrap();
    assert_eq!(run_id.as_str(), "191103_D32611_0365_G00DHB5YXX");
    assert_eq!(run_id.formatted_date(), "2019-11-03");
}

#[test]
fn run_id_from_path_folds_parent_segments() {
    let run_id =
        RunId::from_run_path(Utf8Path::new("/seq/runs/191103_D32611_0365_G00DHB5YXX/Baz/..")).unwrap();
    assert_eq!(run_id.as_str(), "191103_D32611_0365_G00DHB5YXX");

    let run_id =
        RunId::from_run_path(Utf8Path::new("./191103_D32611_0365_G00DHB5YXX/./")).unwrap();
    assert_eq!(run_id.as_str(), "191103_D32611_0365_G00DHB5YXX");

    let err = RunId::from_run_path(Utf8Path::new("191103_D32611_0365_G00DHB5YXX/..")).unwrap_err();
    assert_matches!(err, PrepError::InvalidRunId(_));
}

#[test]
fn strip_registry_id_removes_trailing_digits() {
    assert_eq!(strip_registry_id("project_1"), "project");
    assert_eq!(strip_registry_id("project_00333333"), "project");
    assert_eq!(strip_registry_id("project"), "project");
    assert_eq!(strip_registry_id("project_"), "project_");
}

#[test]
fn project_name_exposes_registry_id() {
    let project = ProjectName::new("FooBar_666");
    assert_eq!(project.bare(), "FooBar");
    assert_eq!(project.registry_id(), Some("666"));

    let project = ProjectName::new("Baz");
    assert_eq!(project.bare(), "Baz");
    assert_eq!(project.registry_id(), None);
    assert_eq!(project.registry_id_or_placeholder(), MISSING_REGISTRY_ID);

    let project = ProjectName::new("Multi_Part_Study_10317");
    assert_eq!(project.bare(), "Multi_Part_Study");
    assert_eq!(project.registry_id(), Some("10317"));
}

#[test]
fn unknown_pipeline_is_a_configuration_error() {
    let err = "bowtie-only".parse::<Pipeline>().unwrap_err();
    assert_matches!(err, PrepError::InvalidPipeline(_));

    let err = " fastp-and-minimap2 ".parse::<Pipeline>().unwrap_err();
    assert_matches!(err, PrepError::InvalidPipeline(_));

    assert_eq!(
        "fastp-and-minimap2".parse::<Pipeline>().unwrap(),
        Pipeline::FastpAndMinimap2
    );
}
