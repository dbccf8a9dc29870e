//! Pipeline combinator integration tests.
//!
//! These tests compose stages through `chain` to check:
//! - The flattening rules (absence, identity, singleton sequences, skips)
//! - Value threading and error recovery across composed stages
//! - The converter family end to end
//! - Timing descriptors surviving composition
//! - A pipeline fed from a finished model

use tether_pipe::{
    date_to_date_string, def, delay, fix, msg, req, scale, stabilize_flush, to_date, to_num,
    to_str,
};
use tether_tests::prelude::*;

mod combination {
    use super::*;

    #[test]
    fn test_no_segments_is_absence() {
        assert!(chain([]).is_none());
    }

    #[test]
    fn test_one_stage_is_returned_unwrapped() {
        let composed = chain([Segment::stage(scale(3.0))]).unwrap();

        assert!(!composed.is_sequence());
        assert_eq!(composed.name(), "scale");
    }

    #[test]
    fn test_one_element_array_is_a_sequence() {
        let composed = chain([Segment::seq(vec![Box::new(scale(3.0))])]).unwrap();

        assert!(composed.is_sequence());
        assert_eq!(composed.apply(Value::Number(2.0)), Ok(Value::Number(6.0)));
    }

    #[test]
    fn test_mixed_segments_flatten_in_order() {
        let composed = chain([
            Segment::stage(to_num()),
            Segment::Skip,
            Segment::seq(vec![Box::new(scale(10.0)), Box::new(fix(1))]),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("2.5".into())),
            Ok(Value::Str("25.0".into()))
        );
    }

    #[test]
    fn test_optional_segments_collapse_to_absence() {
        assert!(chain([Segment::Skip, Segment::opt(None)]).is_none());
    }
}

mod threading {
    use super::*;

    #[test]
    fn test_default_rescues_a_failed_conversion() {
        let composed = chain([
            Segment::stage(to_num()),
            Segment::stage(scale(2.0)),
            Segment::stage(def(0.0)),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("7".into())),
            Ok(Value::Number(14.0))
        );
        assert_eq!(
            composed.apply(Value::Str("seven".into())),
            Ok(Value::Number(0.0))
        );
    }

    #[test]
    fn test_message_replaces_the_error_but_not_values() {
        let composed = chain([
            Segment::stage(req()),
            Segment::stage(to_num()),
            Segment::stage(msg("enter a number")),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("4".into())),
            Ok(Value::Number(4.0))
        );
        assert_eq!(
            composed.apply(Value::Null),
            Err(StageError::Message("enter a number".into()))
        );
    }

    #[test]
    fn test_recovery_resumes_the_remaining_stages() {
        // def rescues mid-chain; the stages after it still run.
        let composed = chain([
            Segment::stage(to_num()),
            Segment::stage(def(1.0)),
            Segment::stage(scale(5.0)),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("oops".into())),
            Ok(Value::Number(5.0))
        );
    }
}

mod converters {
    use super::*;

    #[test]
    fn test_string_to_number_and_back() {
        let composed = chain([
            Segment::stage(to_num()),
            Segment::stage(scale(0.01)),
            Segment::stage(fix(2)),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("1250".into())),
            Ok(Value::Str("12.50".into()))
        );
    }

    #[test]
    fn test_date_entry_pipeline() {
        let composed = chain([
            Segment::stage(req()),
            Segment::stage(to_date()),
            Segment::stage(date_to_date_string()),
        ])
        .unwrap();

        assert_eq!(
            composed.apply(Value::Str("2024-06-01T09:30:00Z".into())),
            Ok(Value::Str("2024-06-01".into()))
        );
        assert_eq!(composed.apply(Value::Null), Err(StageError::Required));
    }
}

mod timing {
    use super::*;

    #[test]
    fn test_single_stage_timing_survives_composition() {
        let composed = chain([Segment::stage(delay(150))]).unwrap();

        assert!(matches!(composed.timing(), Some(Timing::Delay(_))));
    }

    #[test]
    fn test_stabilize_descriptor_keeps_its_flush_value() {
        let composed = chain([Segment::stage(stabilize_flush(300, "..."))]).unwrap();

        match composed.timing() {
            Some(Timing::Stabilize { flush, .. }) => {
                assert_eq!(flush, Some(Value::Str("...".into())));
            }
            other => panic!("expected a stabilize descriptor, got {:?}", other),
        }
    }
}

mod model_sources {
    use super::*;

    #[test]
    fn test_pipeline_formats_a_model_variable() {
        // The pipeline core does not require a model source, but a finished
        // graph composes naturally with one.
        let mut builder = converter_builder();
        let model = builder.end();
        let celsius = model.variable("celsius").unwrap().value.clone();

        let composed = chain([
            Segment::stage(scale(1.8)),
            Segment::seq(vec![Box::new(fix(1)), Box::new(to_str())]),
        ])
        .unwrap();

        assert_eq!(composed.apply(celsius), Ok(Value::Str("0.0".into())));
    }
}
