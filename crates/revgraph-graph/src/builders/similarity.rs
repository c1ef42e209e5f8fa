//! Reviewer similarity graph: `(:REVIEWER)-[:SIM {similarity}]->(:REVIEWER)`.

use std::collections::HashMap;

use revgraph_core::SimilarityMatrix;
use tracing::debug;

use crate::statement::{Alias, GraphStatement, NodeKind};

pub const SIM: &str = "SIM";

/// Similarities below this magnitude count as zero and get no edge.
pub const ZERO_SIMILARITY: f64 = 1e-12;

/// Reviewers with the largest number of outgoing SIM edges.
pub const MOST_SIMILAR_NEIGHBOURS: &str = "MATCH (r:REVIEWER)-[:SIM]->(:REVIEWER)
 WITH r, count(*) AS neighbours
 WITH max(neighbours) AS most
 MATCH (r:REVIEWER)-[:SIM]->(:REVIEWER)
 WITH r, most, count(*) AS neighbours
 WHERE neighbours = most
 RETURN r.reviewerID AS reviewerID, neighbours
 ORDER BY reviewerID";

/// One node per reviewer in matrix order and one directed edge per
/// off-diagonal cell with a non-zero similarity. Both `i -> j` and `j -> i`
/// are emitted.
pub fn similarity_statement(matrix: &SimilarityMatrix) -> GraphStatement {
    let mut g = GraphStatement::new();

    let aliases: HashMap<&str, Alias> = matrix
        .users()
        .iter()
        .map(|u| (u.as_str(), g.node(NodeKind::Reviewer, u)))
        .collect();

    let mut skipped = 0usize;
    for (from, to, similarity) in matrix.off_diagonal() {
        if similarity.abs() < ZERO_SIMILARITY {
            skipped += 1;
            continue;
        }
        g.relate(&aliases[from], SIM, &aliases[to], vec![("similarity", similarity.into())]);
    }

    debug!(nodes = g.node_count(), edges = g.relationship_count(), skipped, "Built similarity statement");
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ParamValue;
    use crate::testutil::parse_create;
    use revgraph_core::UserProducts;

    fn matrix(pairs: &[(&str, &str)]) -> SimilarityMatrix {
        let input = UserProducts::from_pairs(pairs.iter().copied());
        SimilarityMatrix::compute(&input, &input.users()).unwrap()
    }

    #[test]
    fn test_scenario_edges() {
        let m = matrix(&[("u1", "p1"), ("u1", "p2"), ("u2", "p2"), ("u2", "p3"), ("u3", "p1"), ("u3", "p2")]);
        let stmt = similarity_statement(&m).render().unwrap();
        let parsed = parse_create(&stmt.text);

        parsed.assert_referentially_complete();
        assert_eq!(parsed.labelled("REVIEWER"), 3);
        // All six off-diagonal cells are non-zero.
        assert_eq!(parsed.relationships.len(), 6);
        assert!(parsed.relationships.iter().all(|(from, t, to)| from != to && t == "SIM"));

        // u1 = reviewer_0, u3 = reviewer_2
        let idx = parsed
            .relationships
            .iter()
            .position(|(f, _, t)| f == "reviewer_0" && t == "reviewer_2")
            .unwrap();
        assert_eq!(stmt.get_param(&format!("r{idx}_similarity")), Some(&ParamValue::Float(1.0)));
        assert!(parsed.relationships.iter().any(|(f, _, t)| f == "reviewer_2" && t == "reviewer_0"));
    }

    #[test]
    fn test_zero_similarity_skipped() {
        let m = matrix(&[("a", "p1"), ("b", "p2"), ("c", "p1"), ("c", "p2")]);
        let stmt = similarity_statement(&m).render().unwrap();
        let parsed = parse_create(&stmt.text);

        parsed.assert_referentially_complete();
        // a-b disjoint; a-c and b-c overlap, both directions.
        assert_eq!(parsed.relationships.len(), 4);
        assert!(!parsed
            .relationships
            .iter()
            .any(|(f, _, t)| (f == "reviewer_0" && t == "reviewer_1") || (f == "reviewer_1" && t == "reviewer_0")));
    }

    #[test]
    fn test_near_zero_treated_as_zero() {
        let users = vec!["a".to_string(), "b".to_string()];
        let m = SimilarityMatrix::from_values(users, vec![vec![1.0, 1e-15], vec![0.0, 1.0]]).unwrap();
        let g = similarity_statement(&m);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.relationship_count(), 0);
    }

    #[test]
    fn test_isolated_reviewers_still_declared() {
        let m = matrix(&[("a", "p1"), ("b", "p2")]);
        let stmt = similarity_statement(&m).render().unwrap();
        let parsed = parse_create(&stmt.text);
        assert_eq!(parsed.nodes.len(), 2);
        assert!(parsed.relationships.is_empty());
    }
}
