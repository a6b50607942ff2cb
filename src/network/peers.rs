use std::sync::RwLock;

/// Addresses of known peers, shared between connection handlers and the
/// block-production loop.
pub struct Peers {
    inner: RwLock<Vec<String>>,
}

impl Peers {
    pub fn new(initial: Vec<String>) -> Peers {
        let peers = Peers {
            inner: RwLock::new(Vec::new()),
        };
        for addr in initial {
            peers.add(addr);
        }
        peers
    }

    pub fn add(&self, addr: String) {
        if addr.is_empty() {
            return;
        }
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on peers - this should never happen");
        if !inner.iter().any(|known| known == &addr) {
            inner.push(addr);
        }
    }

    pub fn remove(&self, addr: &str) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on peers - this should never happen");
        if let Some(idx) = inner.iter().position(|known| known == addr) {
            inner.remove(idx);
        }
    }

    pub fn all(&self) -> Vec<String> {
        self.inner
            .read()
            .expect("Failed to acquire read lock on peers - this should never happen")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("Failed to acquire read lock on peers - this should never happen")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates() {
        let peers = Peers::new(vec!["127.0.0.1:4000".to_string()]);
        peers.add("127.0.0.1:4000".to_string());
        peers.add("127.0.0.1:5000".to_string());
        peers.add(String::new());

        assert_eq!(peers.len(), 2);
    }

    #[test]
    fn test_remove() {
        let peers = Peers::new(vec!["a".to_string(), "b".to_string()]);
        peers.remove("a");
        assert_eq!(peers.all(), vec!["b".to_string()]);

        peers.remove("not there");
        assert_eq!(peers.len(), 1);
    }
}
