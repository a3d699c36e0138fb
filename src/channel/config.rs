use super::{ChannelOptions, Engine};

pub fn parse_engine(s: &str) -> Option<Engine> {
    match s.to_lowercase().as_str() {
        "tcp" => Some(Engine::Tcp),
        #[cfg(any(test, feature = "channel-mock"))]
        "mock" => Some(Engine::Mock),
        _ => None,
    }
}

pub fn parse_channel_kv(pairs: &[String]) -> ChannelOptions {
    let mut opts = ChannelOptions::default();
    for p in pairs {
        if let Some((k, v)) = p.split_once('=') {
            opts.params.insert(k.to_string(), v.to_string());
        }
    }
    opts
}
