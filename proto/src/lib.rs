use lazy_static::lazy_static;
use prost_reflect::{DescriptorPool, MessageDescriptor, ReflectMessage};

// Include the `serving.fixtures` package generated from model_server.proto.
pub mod model_server {
    include!(concat!(env!("OUT_DIR"), "/serving.fixtures.rs"));
}

const FILE_DESCRIPTOR_SET: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/file_descriptor_set.bin"));

lazy_static! {
    /// Descriptors for every message compiled into this crate. Text format
    /// parsing and printing is driven by these.
    pub static ref DESCRIPTOR_POOL: DescriptorPool = DescriptorPool::decode(FILE_DESCRIPTOR_SET)
        .expect("file descriptor set written by build.rs must decode");
}

macro_rules! reflect_messages {
    ($($message:ty => $full_name:literal),* $(,)?) => {
        $(
            impl ReflectMessage for $message {
                fn descriptor(&self) -> MessageDescriptor {
                    DESCRIPTOR_POOL
                        .get_message_by_name($full_name)
                        .expect(concat!($full_name, " missing from descriptor pool"))
                }
            }
        )*
    };
}

reflect_messages! {
    model_server::ModelSpec => "serving.fixtures.ModelSpec",
    model_server::ModelVersionStatus => "serving.fixtures.ModelVersionStatus",
    model_server::GetModelStatusRequest => "serving.fixtures.GetModelStatusRequest",
    model_server::GetModelStatusResponse => "serving.fixtures.GetModelStatusResponse",
    model_server::ModelConfig => "serving.fixtures.ModelConfig",
    model_server::ModelConfigList => "serving.fixtures.ModelConfigList",
}
