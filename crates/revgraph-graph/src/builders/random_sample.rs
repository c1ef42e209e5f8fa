//! Sampled products and their reviewers:
//! `(:REVIEWER)-[:REVIEWS {time, overall}]->(:PRODUCT)`.

use revgraph_db::queries::products::ReviewDetails;
use tracing::debug;

use super::REVIEWS;
use crate::statement::{GraphStatement, NodeKind};

/// Every sampled product gets a node even when it has no reviews; reviewers
/// come from the review rows. One edge per review row, no filtering.
pub fn random_sample_statement(sampled: &[String], reviews: &ReviewDetails) -> GraphStatement {
    let mut g = GraphStatement::new();

    for reviewer in &reviews.reviewers {
        g.node(NodeKind::Reviewer, reviewer);
    }
    for asin in sampled {
        g.node(NodeKind::Product, asin);
    }

    for (asin, reviewer, time, overall) in reviews.rows() {
        let from = g.node(NodeKind::Reviewer, reviewer);
        let to = g.node(NodeKind::Product, asin);
        g.relate(&from, REVIEWS, &to, vec![("time", time.into()), ("overall", overall.into())]);
    }

    debug!(nodes = g.node_count(), edges = g.relationship_count(), "Built random sample statement");
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ParamValue;
    use crate::testutil::parse_create;

    fn details(rows: &[(&str, &str, &str, i64)]) -> ReviewDetails {
        ReviewDetails {
            asins: rows.iter().map(|r| r.0.to_string()).collect(),
            reviewers: rows.iter().map(|r| r.1.to_string()).collect(),
            times: rows.iter().map(|r| r.2.to_string()).collect(),
            ratings: rows.iter().map(|r| r.3).collect(),
        }
    }

    #[test]
    fn test_one_edge_per_review() {
        let sampled = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        let reviews = details(&[
            ("p1", "u1", "01 1, 2014", 5),
            ("p1", "u2", "02 2, 2014", 3),
            ("p2", "u1", "03 3, 2014", 4),
        ]);

        let stmt = random_sample_statement(&sampled, &reviews).render().unwrap();
        let parsed = parse_create(&stmt.text);

        parsed.assert_referentially_complete();
        assert_eq!(parsed.labelled("REVIEWER"), 2);
        assert_eq!(parsed.labelled("PRODUCT"), 3);
        assert_eq!(parsed.relationships.len(), 3);
        assert_eq!(stmt.get_param("r1_time"), Some(&ParamValue::Str("02 2, 2014".into())));
        assert_eq!(stmt.get_param("r1_overall"), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn test_identifier_shared_by_reviewer_and_product() {
        let sampled = vec!["X1".to_string()];
        let reviews = details(&[("X1", "X1", "t", 1)]);
        let parsed = parse_create(&random_sample_statement(&sampled, &reviews).render().unwrap().text);

        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.relationships, vec![("reviewer_0".to_string(), "REVIEWS".to_string(), "product_0".to_string())]);
    }
}
