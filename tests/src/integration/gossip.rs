//! # Gossip Flows
//!
//! Transactions travel until every node has seen them; intake is idempotent,
//! so a cycle in the peer graph ends once the transaction comes back. Chains
//! travel one hop: a node that adopts a chain does not re-offer it.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bk_02_consensus::VoteTally;
    use bk_03_node::Registration;

    #[tokio::test]
    async fn test_transaction_circles_a_ring_once() {
        let backend = shared_backend();
        let nodes: Vec<_> = ["a", "b", "c"].iter().map(|id| spawn(id, &backend)).collect();
        ring(&nodes).await;
        let t = transactions(1).remove(0);

        assert_eq!(
            nodes[0].register_transaction(t.clone()).await.unwrap(),
            Registration::Added
        );

        for node in &nodes {
            eventually_pending(node, 1).await;
            assert!(node.pending_transactions().await.unwrap().contains_key(&t.hash()));
        }
    }

    #[tokio::test]
    async fn test_full_mesh_converges_on_pending_set() {
        let backend = shared_backend();
        let nodes: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| spawn(id, &backend))
            .collect();
        for node in &nodes {
            for peer in nodes.iter().filter(|p| p.node_id() != node.node_id()) {
                node.register_peer(peer.clone()).await.unwrap();
            }
        }

        for (i, t) in transactions(3).into_iter().enumerate() {
            nodes[i].register_transaction(t).await.unwrap();
        }

        for node in &nodes {
            eventually_pending(node, 3).await;
            assert!(node.chain().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_chain_travels_one_hop_in_a_ring() {
        let backend = shared_backend();
        let nodes: Vec<_> = ["a", "b", "c"].iter().map(|id| spawn(id, &backend)).collect();
        ring(&nodes).await;

        for t in transactions(5) {
            nodes[0].register_transaction(t).await.unwrap();
        }

        let mined = nodes[0].chain().await.unwrap();
        assert_eq!(mined.len(), 1);
        eventually_chain(&nodes[1], &mined).await;

        // b adopted the chain, so it never forwarded the fifth transaction.
        eventually_pending(&nodes[2], 4).await;
        assert!(nodes[2].chain().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stopped_peer_is_left_out_of_the_tally() {
        let seeded = linked_chain(2);
        let backend = backend_with("a", &seeded);
        let a = spawn("a", &backend);
        let b = spawn("b", &backend);
        let gone = spawn("gone", &backend);
        a.register_peer(b.clone()).await.unwrap();
        a.register_peer(gone.clone()).await.unwrap();
        gone.stop().await.unwrap();

        let t = transactions(1).remove(0);
        assert_eq!(a.register_transaction(t).await.unwrap(), Registration::Added);
        assert_eq!(b.pending_transactions().await.unwrap().len(), 1);

        let outcome = a.share_chain().await.unwrap();
        assert_eq!(
            outcome.tally,
            VoteTally {
                accepted: 1,
                rejected: 0,
                unreachable: 1
            }
        );
        assert!(!outcome.rolled_back);
        assert_eq!(b.chain().await.unwrap(), seeded);
    }
}
