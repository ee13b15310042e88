//! Serialization and Deserialization implementation

use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::*;

/// A trie is serialized as the sequence of its networks in lexicographic order.
impl<P: Network + Serialize> Serialize for PrefixTrie<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, P: Network + Deserialize<'de>> Deserialize<'de> for PrefixTrie<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let networks: Vec<P> = Vec::deserialize(deserializer)?;
        Ok(Self::from_iter(networks))
    }
}

#[cfg(test)]
#[cfg(feature = "ipnet")]
mod test {
    use ipnet::Ipv4Net;

    use super::*;

    #[test]
    fn round_trip() {
        let trie: PrefixTrie<Ipv4Net> = ["192.168.1.0/24", "10.0.0.0/8", "192.168.0.0/16"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let json = serde_json::to_string(&trie).unwrap();
        assert_eq!(json, r#"["10.0.0.0/8","192.168.0.0/16","192.168.1.0/24"]"#);
        let back: PrefixTrie<Ipv4Net> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trie);
        assert_eq!(back.len(), 3);
    }
}
