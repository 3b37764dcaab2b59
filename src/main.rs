use std::fs;
use clap::Parser;
use donation_psbt_builder::cli::CliArgs;
use donation_psbt_builder::{AppConfig, AppError, EsploraGateway, FeeEstimator, TransactionBuilder};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    log::debug!("設定: {:?}", config);

    let fee_estimator = FeeEstimator::from_config(&config)?;
    log::debug!("手数料推定の代替値: {}", fee_estimator.fallback());
    let builder = TransactionBuilder::new(EsploraGateway::new(&config), fee_estimator);

    let psbt = builder
        .prepare_donation(&args.network, &args.sender, &args.recipient, args.amount)
        .await
        .inspect_err(|e| log::error!("トランザクションの構築に失敗しました: {}", e))?;

    println!("{}", psbt);

    if let Some(output_file) = &args.output_file {
        fs::write(output_file, psbt.as_bytes()).map_err(|e| {
            log::error!("出力ファイルへの書き込みに失敗しました: {:?}", output_file);
            AppError::Io(e)
        })?;
        log::info!("PSBTを {:?} に保存しました。", output_file);
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}
