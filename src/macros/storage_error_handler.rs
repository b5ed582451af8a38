/// unwrap a storage result, logging the failure under `$target` before returning it.
/// not found and conflicts are expected outcomes and only warn.
macro_rules! storage_handle_error {
    ( $data:expr, $target:expr, $type_str:expr ) => {
        match $data {
            Ok(e) => e,
            Err(error @ crate::errors::Error::NotFoundError { .. })
            | Err(error @ crate::errors::Error::ConflictError { .. }) => {
                log::warn!(target:$target, "Error accessing {}. (error: {})", $type_str, error);
                return Err(error);
            }
            Err(error) => {
                log::error!(target:$target, "Error accessing {}. (error: {})", $type_str, error);
                return Err(error);
            }
        }
    }
}

pub(crate) use storage_handle_error;
