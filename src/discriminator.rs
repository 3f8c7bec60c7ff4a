use sha2::{Digest, Sha512};

/// Five bytes that tell apart GUIDs generated at the same tick by different machines or
/// processes.
///
/// The first three bytes are the leading bytes of the SHA-512 hash of the host name; the last two
/// are the low 16 bits of the process ID, big-endian.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Discriminator([u8; 5]);

impl Discriminator {
    /// Creates a discriminator from raw bytes.
    pub const fn from_bytes(bytes: [u8; 5]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; 5] {
        &self.0
    }

    /// Derives a discriminator from a host name and an optional process ID.
    ///
    /// A missing process ID leaves the last two bytes zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::Discriminator;
    ///
    /// let d = Discriminator::from_host_and_pid("db-01", Some(0x0001_2345));
    /// assert_eq!(d.as_bytes()[3..], [0x23, 0x45]);
    /// assert_eq!(d, Discriminator::from_host_and_pid("db-01", Some(0x2345)));
    /// ```
    pub fn from_host_and_pid(host: &str, pid: Option<u32>) -> Self {
        let hash = Sha512::digest(host.as_bytes());
        let pid = pid.unwrap_or_default().to_be_bytes();
        Self([hash[0], hash[1], hash[2], pid[2], pid[3]])
    }

    /// Derives a discriminator from the host name and ID of the current process.
    ///
    /// This reads the environment once. If the host name cannot be read, the empty string is
    /// hashed instead.
    pub fn from_environment() -> Self {
        let host = match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "could not read host name; hashing empty name");
                String::new()
            }
        };
        let pid = std::process::id();
        let discriminator = Self::from_host_and_pid(&host, Some(pid));

        #[cfg(feature = "tracing")]
        tracing::debug!(%host, pid, ?discriminator, "derived discriminator");
        discriminator
    }
}

impl From<[u8; 5]> for Discriminator {
    fn from(src: [u8; 5]) -> Self {
        Self(src)
    }
}

impl From<Discriminator> for [u8; 5] {
    fn from(src: Discriminator) -> Self {
        src.0
    }
}
