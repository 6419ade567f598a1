use crate::config::ExtractionConfig;
use crate::error::EngineError;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 票据识别服务客户端 (Mindee predict_async 接口)
///
/// 上传文件拿 job_id, 再轮询任务队列直到出结果; 轮询是显式状态机,
/// 次数有上限, 429 时指数退避。
pub struct ExtractionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

/// 识别出的发票字段, 即入账流程第一步的输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub buyer_gstin: String,
    pub supplier_gstin: String,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_amount: BigDecimal,
}

/// 识别任务状态机
#[derive(Debug, Clone)]
pub enum PollState {
    Queued,
    Processing,
    Done(ExtractedInvoice),
    Failed(String),
}

/// 单次轮询结果, 429 单独成态以便上层退避
enum PollOutcome {
    State(PollState),
    RateLimited,
}

#[derive(Debug, Deserialize)]
struct JobEnvelope {
    job: Job,
}

#[derive(Debug, Deserialize)]
struct Job {
    id: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueueEnvelope {
    job: Job,
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    inference: Inference,
}

#[derive(Debug, Deserialize)]
struct Inference {
    prediction: Prediction,
}

#[derive(Debug, Default, Deserialize)]
struct Prediction {
    invoicenumber: Option<FieldValue>,
    invoice_date: Option<FieldValue>,
    buyergstin: Option<FieldValue>,
    suppliergstin: Option<FieldValue>,
    taxamount: Option<TaxAmounts>,
}

#[derive(Debug, Deserialize)]
struct FieldValue {
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TaxAmounts {
    cgst: Option<BigDecimal>,
    sgst: Option<BigDecimal>,
    igst: Option<BigDecimal>,
    total_amount: Option<BigDecimal>,
}

fn field_string(field: Option<FieldValue>) -> String {
    field.and_then(|f| f.value).unwrap_or_default()
}

/// 识别结果 → 发票字段; 开票日期必须有且可解析, 其余字段缺省为空/0
fn to_extracted(prediction: Prediction) -> Result<ExtractedInvoice, String> {
    let date_raw = field_string(prediction.invoice_date);
    let invoice_date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
        .map_err(|_| format!("invoice_date missing or unparseable: {:?}", date_raw))?;

    let tax = prediction.taxamount.unwrap_or_default();
    Ok(ExtractedInvoice {
        invoice_number: field_string(prediction.invoicenumber),
        invoice_date,
        buyer_gstin: field_string(prediction.buyergstin),
        supplier_gstin: field_string(prediction.suppliergstin),
        cgst: tax.cgst.unwrap_or_default(),
        sgst: tax.sgst.unwrap_or_default(),
        igst: tax.igst.unwrap_or_default(),
        total_amount: tax.total_amount.unwrap_or_default(),
    })
}

/// 队列应答 → 状态机状态
fn state_from_queue(status: &str, document: Option<Document>) -> PollState {
    match status {
        "waiting" => PollState::Queued,
        "processing" => PollState::Processing,
        "success" | "completed" => match document {
            Some(doc) => match to_extracted(doc.inference.prediction) {
                Ok(fields) => PollState::Done(fields),
                Err(reason) => PollState::Failed(reason),
            },
            // 状态已完成但结果还没就绪, 下一轮再取
            None => PollState::Processing,
        },
        other => PollState::Failed(format!("job failed with status: {}", other)),
    }
}

impl ExtractionClient {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_polls: config.max_polls,
        }
    }

    /// 上传文件, 返回识别任务 ID
    pub async fn submit(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, EngineError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("document", part);

        let response = self
            .http
            .post(format!("{}/predict_async", self.base_url))
            .header("Authorization", format!("Token {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| EngineError::Extraction(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::Extraction(format!(
                "submit failed with HTTP {}",
                response.status()
            )));
        }

        let envelope: JobEnvelope = response
            .json()
            .await
            .map_err(|e| EngineError::Extraction(e.to_string()))?;

        envelope
            .job
            .id
            .ok_or_else(|| EngineError::Extraction("job id missing in response".to_string()))
    }

    /// 查询一次任务状态
    pub async fn poll(&self, job_id: &str) -> Result<PollState, EngineError> {
        match self.poll_once(job_id).await? {
            PollOutcome::State(state) => Ok(state),
            PollOutcome::RateLimited => Ok(PollState::Processing),
        }
    }

    async fn poll_once(&self, job_id: &str) -> Result<PollOutcome, EngineError> {
        let response = self
            .http
            .get(format!("{}/documents/queue/{}", self.base_url, job_id))
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await
            .map_err(|e| EngineError::Extraction(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Ok(PollOutcome::RateLimited);
        }
        if !response.status().is_success() {
            return Err(EngineError::Extraction(format!(
                "poll failed with HTTP {}",
                response.status()
            )));
        }

        let envelope: QueueEnvelope = response
            .json()
            .await
            .map_err(|e| EngineError::Extraction(e.to_string()))?;

        let status = envelope.job.status.unwrap_or_default();
        Ok(PollOutcome::State(state_from_queue(
            &status,
            envelope.document,
        )))
    }

    /// 提交并轮询到底
    pub async fn extract(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractedInvoice, EngineError> {
        let job_id = self.submit(file_name, bytes).await?;
        tracing::info!("Extraction job {} submitted", job_id);

        let mut rate_limit_hits = 0u32;
        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            match self.poll_once(&job_id).await? {
                PollOutcome::State(PollState::Done(fields)) => {
                    tracing::info!(
                        "Extraction job {} done after {} polls: invoice {}",
                        job_id,
                        attempt,
                        fields.invoice_number
                    );
                    return Ok(fields);
                }
                PollOutcome::State(PollState::Failed(reason)) => {
                    return Err(EngineError::Extraction(reason));
                }
                PollOutcome::State(_) => {
                    rate_limit_hits = 0;
                    tracing::debug!(
                        "Extraction job {} still running, poll {}/{}",
                        job_id,
                        attempt,
                        self.max_polls
                    );
                }
                PollOutcome::RateLimited => {
                    rate_limit_hits += 1;
                    let backoff = self.poll_interval * 2u32.pow(rate_limit_hits.min(5));
                    tracing::warn!(
                        "Rate limit hit on job {}, backing off {:?}",
                        job_id,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Err(EngineError::Extraction(format!(
            "job {} did not finish within {} polls",
            job_id, self.max_polls
        )))
    }
}
