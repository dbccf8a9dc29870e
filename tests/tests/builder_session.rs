//! Builder session integration tests.
//!
//! These tests drive full fluent sessions to check:
//! - Variable declaration, roles, and batch forms
//! - Constraint and method assembly (set-difference inputs, masking)
//! - The pending-constraint commit protocol
//! - Commands
//! - Best-effort accumulation: a failed construct never poisons the session

use tether_tests::prelude::*;

mod declarations {
    use super::*;

    #[test]
    fn test_roles_and_values_survive_a_full_session() {
        let mut builder = ModelBuilder::new("form");
        builder
            .variable("width", 640.0)
            .variable_with("height", VariableSpec::new().init(480.0))
            .variable_with("area", VariableSpec::new().output(true))
            .interface("width")
            .output("height");

        let model = builder.end();
        assert_eq!(model.variable("width").unwrap().value, Value::Number(640.0));
        assert!(!model.variable("width").unwrap().output);
        assert!(model.variable("height").unwrap().output);
        assert!(model.variable("area").unwrap().output);
        assert_eq!(model.variable("area").unwrap().value, Value::Null);
    }

    #[test]
    fn test_batch_declarations_preserve_order_and_share_role() {
        let mut builder = ModelBuilder::new("form");
        builder
            .variables(
                &["first", "last"],
                &[("first", Value::Str("Ada".into()))],
                false,
            )
            .variables_from(&[("x", Value::Number(1.0)), ("y", Value::Number(2.0))], true);

        let model = builder.end();
        let order: Vec<&str> = model.names().collect();
        assert_eq!(order, vec!["first", "last", "x", "y"]);
        assert_eq!(
            model.variable("first").unwrap().value,
            Value::Str("Ada".into())
        );
        assert_eq!(model.variable("last").unwrap().value, Value::Null);
        assert!(model.variable("x").unwrap().output);
        assert!(model.variable("y").unwrap().output);
    }

    #[test]
    fn test_wrapped_existing_variable_keeps_its_value() {
        // A caller-supplied variable carries its value into the new model.
        let reused = tether_model::Variable::new(
            tether_core::VarId::new("legacy.shared#0"),
            "shared",
            Value::Number(7.0),
        );

        let mut builder = ModelBuilder::new("b");
        builder.variable_with("shared", VariableSpec::new().init(999.0).existing(reused));

        let model = builder.end();
        // The reuse path takes no initial value from the declaration.
        assert_eq!(model.variable("shared").unwrap().value, Value::Number(7.0));
        assert_eq!(
            model.variable("shared").unwrap().id.as_str(),
            "legacy.shared#0"
        );
    }

    #[test]
    fn test_custom_equality_reaches_the_variable() {
        let mut builder = ModelBuilder::new("m");
        builder.variable_with(
            "reading",
            VariableSpec::new()
                .init(20.0)
                .equality(|a, b| match (a.as_number(), b.as_number()) {
                    (Some(a), Some(b)) => (a - b).abs() < 0.5,
                    _ => false,
                }),
        );

        let model = builder.end();
        let reading = model.variable("reading").unwrap();
        assert!(!reading.accepts(&Value::Number(20.2)));
        assert!(reading.accepts(&Value::Number(21.0)));
    }
}

mod constraints {
    use super::*;

    #[test]
    fn test_method_inputs_are_the_constraint_set_minus_outputs() {
        let mut builder = ModelBuilder::new("rect");
        builder
            .variables_from(
                &[
                    ("w", Value::Number(4.0)),
                    ("h", Value::Number(3.0)),
                    ("area", Value::Null),
                ],
                false,
            )
            .constraint(&["w", "h", "area"])
            .method("w, h -> area", |args| {
                let product: f64 = args.iter().filter_map(Value::as_number).product();
                Ok(vec![Value::Number(product)])
            });

        let model = builder.end();
        let method = &model.constraints()[0].methods()[0];
        let inputs: Vec<&str> = method
            .inputs()
            .iter()
            .map(|id| model.variable_by_id(id).unwrap().name.as_str())
            .collect();
        assert_eq!(inputs, vec!["w", "h"]);
        assert_eq!(method.call(&nums(&[4.0, 3.0])).unwrap(), nums(&[12.0]));
    }

    #[test]
    fn test_textual_input_list_does_not_shrink_the_input_set() {
        // The signature only names w, but the input set is computed.
        let mut builder = ModelBuilder::new("rect");
        builder
            .variables_from(
                &[("w", Value::Null), ("h", Value::Null), ("area", Value::Null)],
                false,
            )
            .constraint(&["w", "h", "area"])
            .method("w -> area", |args| Ok(vec![args[0].clone()]));

        let model = builder.end();
        let method = &model.constraints()[0].methods()[0];
        assert_eq!(method.inputs().len(), 2);
    }

    #[test]
    fn test_foreign_variable_aborts_the_method_alone() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(
                &[
                    ("a", Value::Null),
                    ("b", Value::Null),
                    ("outsider", Value::Null),
                ],
                false,
            )
            .constraint(&["a", "b"])
            .method("a -> b", |args| Ok(vec![args[0].clone()]))
            .method("outsider -> b", |args| Ok(vec![args[0].clone()]))
            .method("b -> a", |args| Ok(vec![args[0].clone()]));

        assert_eq!(builder.diagnostics().len(), 1);
        let model = builder.end();
        // Both well-formed methods survive around the rejected one.
        assert_eq!(model.constraints()[0].methods().len(), 2);
    }

    #[test]
    fn test_masked_inputs_hide_positions_from_the_callable() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(
                &[("raw", Value::Null), ("edited", Value::Null)],
                false,
            )
            .constraint(&["raw", "edited"])
            .method("*edited, raw -> edited", |args| {
                // The masked position never arrives.
                assert_eq!(args.len(), 1);
                Ok(vec![args[0].clone()])
            });

        let model = builder.end();
        let method = &model.constraints()[0].methods()[0];
        let out = method.call(&nums(&[0.0, 42.0])).unwrap();
        assert_eq!(out, nums(&[42.0]));
    }

    #[test]
    fn test_constraint_like_calls_flush_the_pending_constraint() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .constraint(&["a", "b"])
            .method("a -> b", |args| Ok(vec![args[0].clone()]))
            // Opening the next constraint commits the first.
            .constraint(&["b", "a"])
            .method("b -> a", |args| Ok(vec![args[0].clone()]));

        let model = builder.end();
        assert_eq!(model.constraints().len(), 2);
        assert_eq!(model.constraints()[0].signature, "a, b");
        assert_eq!(model.constraints()[1].signature, "b, a");
    }

    #[test]
    fn test_end_twice_returns_the_same_model() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .constraint(&["a", "b"])
            .method("a -> b", |args| Ok(vec![args[0].clone()]));

        assert_eq!(builder.end().constraints().len(), 1);
        assert_eq!(builder.end().constraints().len(), 1);
        assert_eq!(builder.diagnostics().len(), 0);
    }
}

mod commands {
    use super::*;

    #[test]
    fn test_command_is_invoked_directly() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("low", Value::Number(1.0)), ("high", Value::Number(9.0))], false)
            .command("midpoint", &["low", "high"], |args| {
                let (low, high) = (args[0].as_number().unwrap_or(0.0), args[1].as_number().unwrap_or(0.0));
                Ok(vec![Value::Number((low + high) / 2.0)])
            });

        let model = builder.end();
        let command = model.command("midpoint").unwrap();
        assert_eq!(command.variables().len(), 2);
        assert_eq!(command.invoke(&nums(&[1.0, 9.0])).unwrap(), nums(&[5.0]));
        // Commands live outside the constraint graph.
        assert!(model.constraints().is_empty());
    }

    #[test]
    fn test_command_name_collides_with_variable_namespace() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variable("x", 0.0)
            .command("x", &[], |_| Ok(vec![]));

        assert!(matches!(builder.diagnostics()[0], Diagnostic::NameInUse(_)));
        let model = builder.end();
        assert!(model.command("x").is_none());
        assert!(model.variable("x").is_some());
    }
}

mod recovery {
    use super::*;

    #[test]
    fn test_one_session_survives_many_independent_failures() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variable("a", 1.0)
            .variable("9bad", 0.0) // invalid name
            .variable("a", 2.0) // collision
            .variable("b", 2.0)
            .constraint(&["a", "ghost"]) // unknown member
            .constraint(&["a", "b"])
            .method("a, b", |_| Ok(vec![])) // missing arrow
            .method("a -> b", |args| Ok(vec![args[0].clone()]))
            .equation("a + a = b") // duplicate name
            .equation("b = a * 2")
            .command("go", &["missing"], |_| Ok(vec![])); // unknown argument

        let (model, diagnostics) = builder.finish();
        assert_eq!(diagnostics.len(), 6);
        // Everything well-formed made it in.
        assert!(model.variable("a").is_some());
        assert!(model.variable("b").is_some());
        assert_eq!(model.constraints().len(), 2);
        assert_eq!(model.constraints()[0].methods().len(), 1);
        assert_eq!(model.constraints()[1].methods().len(), 2);
    }

    #[test]
    fn test_rejected_constructs_leave_no_partial_state() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .constraint(&["a", "b"])
            .method("ghost -> b", |_| Ok(vec![Value::Null]));

        let model = builder.end();
        // The rejected method contributed nothing to the committed constraint.
        assert_eq!(model.constraints().len(), 1);
        assert!(model.constraints()[0].methods().is_empty());
    }
}
