//! Equation compilation integration tests.
//!
//! These tests drive textual equations through the builder to check:
//! - One method per referenced variable, each isolating that variable
//! - Constants participating as inputs without becoming members
//! - Membership order (first appearance) vs method order (declaration)
//! - Rejection paths: duplicates, unknown names, parse failures

use tether_tests::prelude::*;

mod directions {
    use super::*;

    #[test]
    fn test_sum_equation_solves_in_all_three_directions() {
        let mut builder = ModelBuilder::new("sum");
        builder
            .variables_from(
                &[("a", Value::Null), ("b", Value::Null), ("total", Value::Null)],
                false,
            )
            .equation("total = a + b");

        let model = builder.end();
        assert_eq!(model.constraints().len(), 1);
        let methods = model.constraints()[0].methods();
        let signatures: Vec<&str> = methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(
            signatures,
            vec!["b, total -> a", "a, total -> b", "a, b -> total"]
        );

        // A consistent assignment satisfies every direction. Bindings are
        // positional over (a, b, total).
        let args = nums(&[2.0, 3.0, 5.0]);
        assert_eq!(methods[0].call(&args).unwrap(), nums(&[2.0]));
        assert_eq!(methods[1].call(&args).unwrap(), nums(&[3.0]));
        assert_eq!(methods[2].call(&args).unwrap(), nums(&[5.0]));
    }

    #[test]
    fn test_mixed_operators_invert_through_nesting() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(
                &[("p", Value::Null), ("q", Value::Null), ("r", Value::Null)],
                false,
            )
            .equation("r = (p - q) / 2");

        let model = builder.end();
        let methods = model.constraints()[0].methods();
        // p = r * 2 + q, q = p - r * 2, r = (p - q) / 2; bindings (p, q, r).
        let args = nums(&[10.0, 4.0, 3.0]);
        assert_eq!(methods[0].call(&args).unwrap(), nums(&[10.0]));
        assert_eq!(methods[1].call(&args).unwrap(), nums(&[4.0]));
        assert_eq!(methods[2].call(&args).unwrap(), nums(&[3.0]));
    }

    #[test]
    fn test_constants_feed_methods_but_stay_out_of_the_constraint() {
        let mut builder = converter_builder();

        let model = builder.end();
        assert_eq!(model.constraints().len(), 1);
        // Only the two genuine variables are members, in equation order.
        assert_eq!(names_of(model, 0), vec!["fahrenheit", "celsius"]);

        let methods = model.constraints()[0].methods();
        assert_eq!(methods.len(), 2);
        let signatures: Vec<&str> = methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(
            signatures,
            vec![
                "fahrenheit, ratio, offset -> celsius",
                "celsius, ratio, offset -> fahrenheit"
            ]
        );

        // Bindings are positional over (celsius, fahrenheit, ratio, offset).
        let args = nums(&[100.0, 212.0, 1.8, 32.0]);
        assert_eq!(methods[0].call(&args).unwrap(), nums(&[100.0]));
        assert_eq!(methods[1].call(&args).unwrap(), nums(&[212.0]));
    }
}

mod membership {
    use super::*;

    #[test]
    fn test_constraint_members_follow_equation_order() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(
                &[("a", Value::Null), ("b", Value::Null), ("c", Value::Null)],
                false,
            )
            .equation("c = a + b");

        let model = builder.end();
        assert_eq!(names_of(model, 0), vec!["c", "a", "b"]);
        assert_eq!(model.constraints()[0].signature, "c, a, b");
    }

    #[test]
    fn test_equations_commit_immediately() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .equation("b = a * 3")
            // No constraint is left open by an equation.
            .method("a -> b", |args| Ok(vec![args[0].clone()]));

        assert!(matches!(
            builder.diagnostics()[0],
            Diagnostic::NoOpenConstraint(_)
        ));
        assert_eq!(builder.end().constraints().len(), 1);
    }
}

mod rejection {
    use super::*;

    #[test]
    fn test_duplicate_variable_rejects_the_whole_equation() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .equation("a + a = b");

        assert!(matches!(
            builder.diagnostics()[0],
            Diagnostic::DuplicateEquationName(_)
        ));
        assert!(builder.end().constraints().is_empty());
    }

    #[test]
    fn test_unknown_name_rejects_the_whole_equation() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variable("a", 1.0)
            .equation("a = phantom * 2");

        assert!(matches!(
            builder.diagnostics()[0],
            Diagnostic::UnknownName(ref name) if name == "phantom"
        ));
        assert!(builder.end().constraints().is_empty());
    }

    #[test]
    fn test_parse_failure_skips_only_this_equation() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("a", Value::Null), ("b", Value::Null)], false)
            .equation("a = * b")
            .equation("a = b + 1");

        assert_eq!(builder.diagnostics().len(), 1);
        assert!(matches!(
            builder.diagnostics()[0],
            Diagnostic::EquationParse { .. }
        ));
        // The well-formed follow-up still built its constraint.
        assert_eq!(builder.end().constraints().len(), 1);
    }

    #[test]
    fn test_unsupported_syntax_is_rejected_not_guessed() {
        let mut builder = ModelBuilder::new("m");
        builder
            .variables_from(&[("x", Value::Null), ("y", Value::Null)], false)
            .equation("y = x ^ 2");

        assert!(matches!(
            builder.diagnostics()[0],
            Diagnostic::EquationParse { .. }
        ));
        assert!(builder.end().constraints().is_empty());
    }
}
