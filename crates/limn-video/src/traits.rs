use crate::{CaptureError, MediaStream, VideoConstraints};

/// Something that can hand out camera streams.
///
/// A request resolves exactly once: either a live stream or an error
/// (`PermissionDenied`, `NotFound`, or a generic failure). There is no retry.
#[allow(async_fn_in_trait)]
pub trait CaptureSource {
    async fn request_stream(
        &mut self,
        constraints: &VideoConstraints,
    ) -> Result<MediaStream, CaptureError>;
}
