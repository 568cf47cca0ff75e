//! Sealer configuration.

/// Construction-time settings for a [`crate::CredentialSealer`].
///
/// The default accepts every string the sealer itself produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SealerConfig {
    /// Longest wire string accepted by
    /// [`deserialize_from_string`](crate::CredentialSealer::deserialize_from_string),
    /// or `None` for no limit.
    ///
    /// Longer input is rejected before base64 decoding. Opt in when wire
    /// strings arrive from a channel with its own bound (cookies, query
    /// parameters); a limit below the size of sealed credentials makes
    /// those credentials unopenable.
    pub max_wire_len: Option<usize>,
}

impl SealerConfig {
    /// Set the wire length limit.
    #[must_use]
    pub fn with_max_wire_len(mut self, max_wire_len: usize) -> Self {
        self.max_wire_len = Some(max_wire_len);
        self
    }
}
