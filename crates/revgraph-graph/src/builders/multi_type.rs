//! Reviewers of several product types:
//! `(:REVIEWER)-[:REVIEWS {n_products}]->(:TYPE)`.

use revgraph_db::queries::reviewers::ReviewerTypeCounts;
use tracing::debug;

use super::REVIEWS;
use crate::statement::{GraphStatement, NodeKind};

pub fn multi_type_statement(counts: &ReviewerTypeCounts) -> GraphStatement {
    let mut g = GraphStatement::new();

    for reviewer in &counts.reviewers {
        g.node(NodeKind::Reviewer, reviewer);
    }
    for product_type in &counts.types {
        g.node(NodeKind::Type, product_type);
    }

    for (reviewer, product_type, n) in counts.rows() {
        let from = g.node(NodeKind::Reviewer, reviewer);
        let to = g.node(NodeKind::Type, product_type);
        g.relate(&from, REVIEWS, &to, vec![("n_products", n.into())]);
    }

    debug!(nodes = g.node_count(), edges = g.relationship_count(), "Built multi-type statement");
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ParamValue;
    use crate::testutil::parse_create;

    #[test]
    fn test_reviewer_type_counts() {
        let counts = ReviewerTypeCounts {
            reviewers: vec!["A".into(), "A".into(), "B".into()],
            types: vec!["x".into(), "y".into(), "x".into()],
            counts: vec![3, 1, 2],
        };

        let stmt = multi_type_statement(&counts).render().unwrap();
        let parsed = parse_create(&stmt.text);

        parsed.assert_referentially_complete();
        assert_eq!(parsed.labelled("REVIEWER"), 2);
        assert_eq!(parsed.labelled("TYPE"), 2);
        assert_eq!(
            parsed.relationships,
            vec![
                ("reviewer_0".to_string(), "REVIEWS".to_string(), "type_0".to_string()),
                ("reviewer_0".to_string(), "REVIEWS".to_string(), "type_1".to_string()),
                ("reviewer_1".to_string(), "REVIEWS".to_string(), "type_0".to_string()),
            ]
        );
        assert_eq!(stmt.get_param("r0_n_products"), Some(&ParamValue::Int(3)));
        assert_eq!(stmt.get_param("r1_n_products"), Some(&ParamValue::Int(1)));
        assert_eq!(stmt.get_param("r2_n_products"), Some(&ParamValue::Int(2)));
        assert_eq!(stmt.get_param("type_1"), Some(&ParamValue::Str("y".into())));
    }
}
