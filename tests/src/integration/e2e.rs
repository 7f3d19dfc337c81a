//! # End-to-End Flow
//!
//! Two nodes peered both ways. Whichever one fills its pool mines, offers the
//! longer chain, and the other adopts it and drops the transactions it had
//! pooled. Chain offers always reach a peer before the gossip of the
//! transaction that completed the block, so the adopting side never mines a
//! competing block.
//!
//! Vote rounds are applied in the order their chains were offered. An
//! explicit `share_chain` right after mining is rejected by a peer that has
//! already adopted the block, and must not undo it.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bk_03_node::Registration;

    #[tokio::test]
    async fn test_mined_block_is_adopted_by_peer() {
        let backend = shared_backend();
        let a = spawn("node-a", &backend);
        let b = spawn("node-b", &backend);
        peer_both_ways(&a, &b).await;
        let txs = transactions(5);

        for t in &txs[..4] {
            assert_eq!(a.register_transaction(t.clone()).await.unwrap(), Registration::Added);
        }
        assert!(a.chain().await.unwrap().is_empty());
        assert_eq!(a.pending_transactions().await.unwrap().len(), 4);
        assert_eq!(b.pending_transactions().await.unwrap().len(), 4);

        assert_eq!(a.register_transaction(txs[4].clone()).await.unwrap(), Registration::Added);

        let chain_a = a.chain().await.unwrap();
        assert_eq!(chain_a.len(), 1);
        assert_eq!(b.chain().await.unwrap(), chain_a);
        assert!(a.pending_transactions().await.unwrap().is_empty());
        assert!(b.pending_transactions().await.unwrap().is_empty());

        // b already holds the same chain, so it rejects the re-offer.
        let outcome = a.share_chain().await.unwrap();
        assert_eq!(outcome.tally.rejected, 1);
        assert!(!outcome.rolled_back);
        assert_eq!(a.chain().await.unwrap(), chain_a);
        assert_eq!(b.chain().await.unwrap(), chain_a);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_share_after_mining_keeps_nodes_in_step() {
        for round in 0..100 {
            let backend = shared_backend();
            let a = spawn("node-a", &backend);
            let b = spawn("node-b", &backend);
            peer_both_ways(&a, &b).await;

            for t in transactions(5) {
                a.register_transaction(t).await.unwrap();
            }
            let outcome = a.share_chain().await.unwrap();

            assert!(!outcome.rolled_back, "round {round} rolled back");
            let chain_a = a.chain().await.unwrap();
            assert_eq!(chain_a.len(), 1, "round {round}");
            assert_eq!(b.chain().await.unwrap(), chain_a, "round {round}");

            a.stop().await.unwrap();
            b.stop().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_roles_reverse_on_next_block() {
        let backend = shared_backend();
        let a = spawn("node-a", &backend);
        let b = spawn("node-b", &backend);
        peer_both_ways(&a, &b).await;

        for t in transactions(5) {
            a.register_transaction(t).await.unwrap();
        }
        let first = a.chain().await.unwrap();
        assert_eq!(b.chain().await.unwrap(), first);

        for t in transactions_from(5, 5) {
            assert_eq!(b.register_transaction(t).await.unwrap(), Registration::Added);
        }

        let second = b.chain().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second.blocks()[0], first.blocks()[0]);
        assert_eq!(a.chain().await.unwrap(), second);
        assert!(a.pending_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resubmitting_mined_transaction_is_ignored() {
        let backend = shared_backend();
        let a = spawn("node-a", &backend);
        let b = spawn("node-b", &backend);
        peer_both_ways(&a, &b).await;
        let txs = transactions(5);

        for t in &txs {
            a.register_transaction(t.clone()).await.unwrap();
        }
        b.chain().await.unwrap();

        for node in [&a, &b] {
            assert_eq!(
                node.register_transaction(txs[0].clone()).await.unwrap(),
                Registration::AlreadyIncluded
            );
            assert!(node.pending_transactions().await.unwrap().is_empty());
        }
    }
}
