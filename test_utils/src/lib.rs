mod counting_thread_pool;
pub mod matchers;
pub mod paths;
mod proto_text;

pub use counting_thread_pool::CountingThreadPool;
pub use matchers::{equals_proto, equals_proto_message, not, Matcher, Not, ProtoStringMatcher};
pub use proto_text::{create_from_text, try_create_from_text, FixtureParseError};
pub use thread_pool::{DefaultEnv, Env, Task, ThreadPool, ThreadPoolInterface};
