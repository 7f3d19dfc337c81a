//! # Persistence Flows
//!
//! Chains live in the backend, not in the actor: a node restarted against
//! the same directory resumes from the chain it last saved.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bk_01_chain_storage::{ChainBackend, FileChainBackend};
    use bk_03_node::{NodeActor, NodeConfig};
    use node_runtime::{parse_line, NodeRuntime, RuntimeConfig};
    use shared_types::{Canonical, Chain, Timestamp};
    use std::sync::Arc;

    fn file_backend(dir: &std::path::Path) -> Arc<dyn ChainBackend> {
        Arc::new(FileChainBackend::new(dir).unwrap())
    }

    #[tokio::test]
    async fn test_chain_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let backend = file_backend(dir.path());

        let a = spawn("node-a", &backend);
        for t in transactions(5) {
            a.register_transaction(t).await.unwrap();
        }
        let mined = a.chain().await.unwrap();
        a.stop().await.unwrap();

        let reopened = file_backend(dir.path());
        let restarted = NodeActor::spawn("node-a", reopened, NodeConfig::default()).unwrap();
        assert_eq!(restarted.chain().await.unwrap(), mined);
        assert!(restarted.pending_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adopted_chain_is_written_per_node() {
        let dir = tempfile::tempdir().unwrap();
        let backend = file_backend(dir.path());
        let a = spawn("node-a", &backend);
        let b = spawn("node-b", &backend);
        peer_both_ways(&a, &b).await;

        for t in transactions(5) {
            a.register_transaction(t).await.unwrap();
        }
        let mined = a.chain().await.unwrap();
        assert_eq!(b.chain().await.unwrap(), mined);

        for id in ["node-a", "node-b"] {
            let text = std::fs::read_to_string(dir.path().join(format!("{id}.json"))).unwrap();
            let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(doc["blocks"].as_array().map(Vec::len), Some(1));
            assert_eq!(doc["blocks"][0]["hash"], mined.blocks()[0].hash());
            assert_eq!(Chain::from_canonical(&doc).unwrap(), mined);
        }
    }

    #[tokio::test]
    async fn test_runtime_mines_from_input_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RuntimeConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        config.validate().unwrap();

        let backend = Arc::new(FileChainBackend::from_config(&config.storage).unwrap());
        let mut runtime = NodeRuntime::start(&config, backend).await.unwrap();

        let input = [
            r#"{"seller_id": "alice", "buyer_id": "bob", "amount": 1}"#,
            r#"{"seller_id": "bob", "buyer_id": "carol", "amount": 2}"#,
            "",
            r#"{"seller_id": "carol", "buyer_id": "dave", "amount": 3}"#,
            r#"{"seller_id": "dave", "buyer_id": "erin", "amount": 4}"#,
            r#"{"seller_id": "erin", "buyer_id": "alice", "amount": 5}"#,
        ];
        for line in input {
            if let Some(tx) = parse_line(line, Timestamp::now()).unwrap() {
                runtime.submit(tx).await.unwrap();
            }
        }

        let lengths = runtime.shutdown().await.unwrap();
        assert_eq!(
            lengths,
            vec![("node-a".to_string(), 1), ("node-b".to_string(), 1)]
        );
        assert!(dir.path().join("node-a.json").exists());
        assert!(dir.path().join("node-b.json").exists());
    }
}
