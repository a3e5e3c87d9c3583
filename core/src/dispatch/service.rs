use super::request::{
    AggregatePatch, CacheDocument, CacheSnapshot, DeleteRequest, ReadRequest, ReplaceRequest,
    UpsertRequest, UpsertedEntry,
};
use super::target::{present, DeleteTarget, Operation, ReadTarget, ReplaceTarget, UpsertTarget};
use crate::model::{ZoomRange, ZoomViewport};
use crate::prelude::{CacheError, CacheResult};
use crate::storage::{CollectionStore, Histograms, Rois, Settings, StorageRoot, ZoomRanges};
use crate::telemetry::{MetricsRecorder, MetricsSnapshot, OperationLog};
use crate::upsert::upsert;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Routes the four verbs to the collection stores.
///
/// Aggregate (`all`) operations touch each collection independently; a failure
/// halfway leaves the earlier collections already rewritten.
pub struct CacheService {
    root: StorageRoot,
    rois: CollectionStore<Rois>,
    settings: CollectionStore<Settings>,
    histograms: CollectionStore<Histograms>,
    zoom_ranges: CollectionStore<ZoomRanges>,
    log: OperationLog,
    metrics: MetricsRecorder,
}

impl CacheService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = StorageRoot::new(root);
        Self {
            rois: CollectionStore::new(root.clone()),
            settings: CollectionStore::new(root.clone()),
            histograms: CollectionStore::new(root.clone()),
            zoom_ranges: CollectionStore::new(root.clone()),
            root,
            log: OperationLog::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        self.root.path()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn read(&self, request: ReadRequest) -> CacheResult<CacheDocument> {
        let outcome = self.read_target(request).await;
        self.observe(Operation::Read, outcome)
    }

    pub async fn replace(&self, request: ReplaceRequest) -> CacheResult<()> {
        let outcome = self.replace_target(request).await;
        self.observe(Operation::Replace, outcome)
    }

    pub async fn delete(&self, request: DeleteRequest) -> CacheResult<()> {
        let outcome = self.delete_target(request).await;
        self.observe(Operation::Delete, outcome)
    }

    pub async fn upsert(&self, request: UpsertRequest) -> CacheResult<UpsertedEntry> {
        let outcome = self.upsert_target(request).await;
        self.observe(Operation::Upsert, outcome)
    }

    fn observe<T>(&self, operation: Operation, outcome: CacheResult<T>) -> CacheResult<T> {
        self.metrics.record_operation(operation);
        if let Err(err) = &outcome {
            self.metrics.record_error(err.is_client_error());
            self.log.failure(operation, err);
        }
        outcome
    }

    async fn read_target(&self, request: ReadRequest) -> CacheResult<CacheDocument> {
        let target = ReadTarget::from_wire(request.kind.as_deref())?;
        self.log.record(Operation::Read, &format!("{target:?}"));

        let document = match target {
            ReadTarget::Rois => CacheDocument::Rois(self.rois.read().await?),
            ReadTarget::Settings => CacheDocument::Settings(self.settings.read().await?),
            ReadTarget::Histograms => CacheDocument::Histograms(self.histograms.read().await?),
            ReadTarget::ZoomRanges => CacheDocument::ZoomRanges(self.zoom_ranges.read().await?),
            ReadTarget::All => CacheDocument::All(CacheSnapshot {
                rois: self.rois.read().await?,
                settings: self.settings.read().await?,
                histograms: self.histograms.read().await?,
                zoom_ranges: self.zoom_ranges.read().await?,
            }),
        };
        Ok(document)
    }

    async fn replace_target(&self, request: ReplaceRequest) -> CacheResult<()> {
        let target = ReplaceTarget::from_wire(request.kind.as_deref())?;
        let data = request.data.ok_or(CacheError::MissingParameter("data"))?;
        self.log.record(Operation::Replace, &format!("{target:?}"));

        match target {
            ReplaceTarget::Rois => self.rois.write(&decode(data)?).await,
            ReplaceTarget::Settings => self.settings.write(&decode(data)?).await,
            ReplaceTarget::Histograms => self.histograms.write(&decode(data)?).await,
            ReplaceTarget::ZoomRanges => self.zoom_ranges.write(&decode(data)?).await,
            ReplaceTarget::All => {
                let patch: AggregatePatch = decode(data)?;
                if let Some(rois) = &patch.rois {
                    self.rois.write(rois).await?;
                }
                if let Some(settings) = &patch.settings {
                    self.settings.write(settings).await?;
                }
                if let Some(histograms) = &patch.histograms {
                    self.histograms.write(histograms).await?;
                }
                if let Some(zoom_ranges) = &patch.zoom_ranges {
                    self.zoom_ranges.write(zoom_ranges).await?;
                }
                Ok(())
            }
        }
    }

    async fn delete_target(&self, request: DeleteRequest) -> CacheResult<()> {
        let target = DeleteTarget::from_wire(request.kind.as_deref(), request.id.as_deref())?;
        self.log.record(Operation::Delete, &format!("{target:?}"));

        match target {
            DeleteTarget::Rois => self.rois.reset().await,
            DeleteTarget::Settings => self.settings.reset().await,
            DeleteTarget::Histograms => self.histograms.reset().await,
            DeleteTarget::ZoomRanges => self.zoom_ranges.reset().await,
            DeleteTarget::Histogram(id) => {
                self.zoom_ranges
                    .update(|ranges| Ok(ranges.remove(&id)))
                    .await?;
                self.rois.update(|rois| Ok(rois.remove(&id))).await?;
                Ok(())
            }
            DeleteTarget::All => {
                self.rois.reset().await?;
                self.settings.reset().await?;
                self.histograms.reset().await?;
                self.zoom_ranges.reset().await
            }
        }
    }

    async fn upsert_target(&self, request: UpsertRequest) -> CacheResult<UpsertedEntry> {
        let target = UpsertTarget::from_wire(request.kind.as_deref())?;
        let histogram_id = present(request.histogram_id.as_deref())
            .ok_or(CacheError::MissingParameter("histogramId"))?
            .to_string();

        match target {
            UpsertTarget::Roi => {
                let roi_id = present(request.roi_id.as_deref())
                    .ok_or(CacheError::MissingParameter("roiId"))?
                    .to_string();
                let patch = patch_object(request.data)?;
                self.log.record(
                    Operation::Upsert,
                    &format!("roi {roi_id} on histogram {histogram_id}"),
                );

                let roi = self
                    .rois
                    .update(|rois| {
                        let list = rois.entry(histogram_id).or_default();
                        let outcome = upsert(list, &roi_id, &patch)?;
                        Ok(list[outcome.index()].clone())
                    })
                    .await?;
                Ok(UpsertedEntry::Roi(roi))
            }
            UpsertTarget::Histogram => {
                let patch = patch_object(request.data)?;
                self.log
                    .record(Operation::Upsert, &format!("histogram {histogram_id}"));
                if patch.contains_key("rois") {
                    self.log.note(&format!(
                        "histogram {histogram_id} carries embedded rois; they are not synchronized with the ROI collection"
                    ));
                }

                let config = self
                    .histograms
                    .update(|histograms| {
                        let outcome = upsert(histograms, &histogram_id, &patch)?;
                        Ok(histograms[outcome.index()].clone())
                    })
                    .await?;
                Ok(UpsertedEntry::Histogram(config))
            }
            UpsertTarget::ZoomRange => {
                let viewport: ZoomViewport =
                    decode(request.data.ok_or(CacheError::MissingParameter("data"))?)?;
                self.log
                    .record(Operation::Upsert, &format!("zoom range {histogram_id}"));

                let range = self
                    .zoom_ranges
                    .update(|ranges| {
                        let range = ZoomRange::stamped(
                            &viewport,
                            chrono::Utc::now().timestamp_millis(),
                        );
                        ranges.insert(histogram_id, range);
                        Ok(range)
                    })
                    .await?;
                Ok(UpsertedEntry::ZoomRange(range))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> CacheResult<T> {
    serde_json::from_value(data).map_err(|err| CacheError::Validation(err.to_string()))
}

fn patch_object(data: Option<Value>) -> CacheResult<Map<String, Value>> {
    match data.ok_or(CacheError::MissingParameter("data"))? {
        Value::Object(fields) => Ok(fields),
        _ => Err(CacheError::Validation("data must be an object".into())),
    }
}
