// End-to-end checks of the correction engine and the over-representation workflow
// working together on realistic inputs.

#[cfg(test)]
mod integration_tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use single_enrichment::ValidationError;
    use single_enrichment::enrichment::{Background, Network, QuerySetConfig, enrichment_test, query_set};
    use single_enrichment::testing::correction::correct_pvalues;

    /// Three regulators with five targets each; T3 overlaps T1 and T2.
    fn regulon_network() -> Network {
        let mut pairs = Vec::new();
        for (source, targets) in [
            ("T1", ["G01", "G02", "G03", "G04", "G05"]),
            ("T2", ["G06", "G07", "G08", "G09", "G10"]),
            ("T3", ["G04", "G05", "G06", "G07", "G11"]),
        ] {
            for target in targets {
                pairs.push((source, target));
            }
        }
        Network::from_pairs(pairs)
    }

    #[test]
    fn test_three_by_four_matrix() {
        let ps = array![
            [0.01f64, 0.02, 0.03, 0.50],
            [0.03, 0.50, 0.01, 0.02],
            [1.00, 0.00, 0.25, 0.25]
        ];
        let adjusted = correct_pvalues(ps.view()).unwrap();

        for (col, expected) in [0.04, 0.04, 0.04, 0.50].into_iter().enumerate() {
            assert_relative_eq!(adjusted[[0, col]], expected, epsilon = 1e-12);
        }
        // same values, permuted columns
        assert_relative_eq!(adjusted[[1, 1]], 0.50, epsilon = 1e-12);
        assert_relative_eq!(adjusted[[1, 2]], 0.04, epsilon = 1e-12);

        assert_eq!(adjusted[[2, 1]], 0.0);
        assert_relative_eq!(adjusted[[2, 2]], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(adjusted[[2, 3]], 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(adjusted[[2, 0]], 1.0);

        // the largest raw p-value is never adjusted below any smaller one
        for row in adjusted.rows() {
            assert!(row.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
        assert!(adjusted[[0, 3]] >= adjusted[[0, 0]]);
        assert!(adjusted[[0, 3]] >= adjusted[[0, 2]]);
    }

    #[test]
    fn test_query_matching_one_source() {
        let net = regulon_network();
        let query: Vec<&str> = net.target_names("T1").unwrap();

        let results = enrichment_test(&query, &net, Background::Fixed(20_000), 0.5).unwrap();
        assert_eq!(results.len(), 3);

        let top = &results[0];
        assert_eq!(top.source, "T1");
        assert!(top.statistic > 0.0);
        assert_eq!(top.table.a, 5);
        assert_eq!(top.table.b, 0);
        assert_eq!(top.table.c, 0);
        // the smallest tail attainable for these margins: 1 / C(20000, 5)
        assert!(top.p_value < 1e-15);
        assert!(top.is_significant(0.05));

        let t2 = results.iter().find(|r| r.source == "T2").unwrap();
        assert_eq!(t2.table.a, 0);
        assert_eq!(t2.p_value, 1.0);
        assert_eq!(t2.adjusted_p_value, 1.0);
    }

    #[test]
    fn test_disjoint_query_in_derived_universe() {
        let net = regulon_network();
        let results =
            enrichment_test(["G08", "G09", "G10"], &net, Background::Derived, 0.5).unwrap();

        let t1 = results.iter().find(|r| r.source == "T1").unwrap();
        assert_eq!(t1.table.a, 0);
        assert!(t1.statistic < 0.0);
        assert_relative_eq!(t1.p_value, 1.0, epsilon = 1e-12);

        for r in &results {
            assert_eq!(r.table.total() as usize, net.n_features());
        }
        assert_eq!(results[0].source, "T2");
    }

    #[test]
    fn test_results_sorted_by_adjusted_then_raw() {
        let net = regulon_network();
        let results = enrichment_test(["G04", "G05", "G06", "G07"], &net, Background::Derived, 0.5)
            .unwrap();
        assert_eq!(results[0].source, "T3");
        for w in results.windows(2) {
            assert!(
                (w[0].adjusted_p_value, w[0].p_value) <= (w[1].adjusted_p_value, w[1].p_value)
            );
        }
    }

    #[test]
    fn test_query_set_workflow() {
        let mut pairs: Vec<(String, String)> = regulon_network()
            .edges()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        pairs.push(("tiny".to_string(), "G01".to_string()));
        let net = Network::from_pairs(pairs);

        let config = QuerySetConfig::default();
        let results = query_set(["G01", "G02", "G03"], &net, &config).unwrap();
        assert!(results.iter().all(|r| r.source != "tiny"));
        assert_eq!(results[0].source, "T1");
        assert!(results.iter().all(|r| r.table.total() == 20_000));

        let derived = query_set(
            ["G01", "G02", "G03"],
            &net,
            &config.clone().with_background(None),
        )
        .unwrap();
        // "tiny" only pointed at G01, which T1 still covers
        assert!(derived.iter().all(|r| r.table.total() == 11));

        let all = query_set(["G01"], &net, &config.with_tmin(1)).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_empty_network_after_pruning() {
        let net = regulon_network();
        let config = QuerySetConfig::default().with_tmin(50);
        let results = query_set(["G01"], &net, &config).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_validation_errors_surface_typed() {
        let net = regulon_network();

        let err = query_set(
            ["G01"],
            &net,
            &QuerySetConfig::default().with_background(Some(-1.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidBackground { .. })
        ));

        let err = enrichment_test(["G01"], &net, Background::Fixed(3), 0.5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::BackgroundTooSmall { .. })
        ));

        let ps = array![[0.1, f64::NAN]];
        let err = correct_pvalues(ps.view()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::NonNumeric { row: 0, col: 1 })
        ));
    }
}
