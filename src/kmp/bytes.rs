//! Layer-tagged byte sequences.
//!
//! Every codec stage produces its own owned buffer type, so bytes of one
//! layer cannot be handed to the codec of another layer by accident.

use std::fmt;
use std::ops::Deref;

macro_rules! layer_bytes {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
                $name(bytes.into())
            }

            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            pub fn into_vec(self) -> Vec<u8> {
                self.0
            }

            /// Uppercase hex representation, as used in log messages.
            pub fn to_hex(&self) -> String {
                hex::encode_upper(&self.0)
            }
        }

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                $name(bytes)
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                $name(bytes.to_vec())
            }
        }

        impl<const N: usize> From<&[u8; N]> for $name {
            fn from(bytes: &[u8; N]) -> Self {
                $name(bytes.to_vec())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }
    };
}

layer_bytes!(
    /// Raw bytes as sent/received on the wire, including framing.
    PhysicalBytes
);
layer_bytes!(
    /// De-framed, de-stuffed bytes: address + application bytes + CRC.
    DataLinkBytes
);
layer_bytes!(
    /// Address and CRC stripped; still starts with the command ID.
    ApplicationBytes
);
layer_bytes!(
    /// Command data only (command ID stripped).
    ApplicationDataBytes
);
