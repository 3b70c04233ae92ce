/// Constructor shared by every page client: each one wraps the collection
/// handle of the page it serves.
macro_rules! impl_client_new {
    ($client_name:ident) => {
        impl $client_name {
            pub fn new(inner: crate::collection::Collections) -> Self {
                Self { inner }
            }
        }
    };
}
