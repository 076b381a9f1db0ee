/// Implements [`Listener`](crate::subscriber::Listener) for a type by listing
/// the event kinds it subscribes to.
///
/// The type must implement [`Subscriber<E>`](crate::subscriber::Subscriber)
/// for every listed event kind `E`.
///
/// # Syntax
///
/// ```rust,ignore
/// listener!(MyListener: FirstEvent, SecondEvent);
/// ```
///
/// # Example
///
/// ```rust,ignore
/// use pwr_dispatch::listener;
/// use pwr_dispatch::event::connection::ConnectEvent;
/// use pwr_dispatch::event::connection::ConnectListener;
///
/// struct Greeter;
///
/// impl ConnectListener for Greeter {
///     fn on_connect(&self, event: &ConnectEvent) -> anyhow::Result<()> {
///         println!("hello {}", event.client_id);
///         Ok(())
///     }
/// }
///
/// listener!(Greeter: ConnectEvent);
///
/// // The macro generates:
/// // - `impl Listener for Greeter` whose `capabilities()` provides a
/// //   `Subscriber<ConnectEvent>` handle backed by the same `Arc`
/// ```
#[macro_export]
macro_rules! listener {
    ($ty:ty : $($event:ty),+ $(,)?) => {
        impl $crate::subscriber::Listener for $ty {
            fn capabilities(
                self: ::std::sync::Arc<Self>,
            ) -> $crate::subscriber::Capabilities {
                let mut capabilities = $crate::subscriber::Capabilities::new();
                $(
                    capabilities.provide::<$event>(self.clone());
                )+
                capabilities
            }
        }
    };
}
