use async_trait::async_trait;
use cbt_domain::SessionData;

/// Callback de persistencia remota. Puede ser asíncrono y puede fallar; un
/// fallo nunca revierte el estado local.
#[async_trait]
pub trait RemoteSink: Send + Sync {
  /// Recibe la instantánea completa tras cada edición.
  async fn on_change(&self, data: &SessionData) -> anyhow::Result<()>;

  /// Recibe la sesión final al alcanzar el estado terminal.
  async fn on_complete(&self, _data: &SessionData) -> anyhow::Result<()> {
    Ok(())
  }
}

/// Sink que acepta todo sin hacer nada (modo sólo local).
pub struct NoopRemote;

#[async_trait]
impl RemoteSink for NoopRemote {
  async fn on_change(&self, _data: &SessionData) -> anyhow::Result<()> {
    Ok(())
  }
}
